// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use crate::{Error, ErrorKind};

/// Id of the default changelist, which is always offered and has no stored comment.
pub const DEFAULT_CHANGELIST: u32 = 0;

/// A pending changelist the user can check in, with its description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeList {
    /// Changelist number.
    pub id: u32,
    /// Description recorded with the changelist.
    pub comment: String,
}

impl ChangeList {
    /// Creates a changelist entry.
    pub fn new(id: u32, comment: impl Into<String>) -> Self {
        Self {
            id,
            comment: comment.into(),
        }
    }
}

/// The details collected for a check-in, as filled in by the user.
///
/// The form starts out with the values it was created with and tracks the user's edits.
/// Choosing a changelist with [`select_changelist`](Self::select_changelist) shows that
/// changelist's description as the comment. The form is finished with [`accept`](Self::accept)
/// or [`cancel`](Self::cancel).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckinForm {
    user: String,
    date: String,
    root: String,
    auto_resolve: bool,
    comment: String,
    changelists: Vec<ChangeList>,
    selected: u32,
}

impl CheckinForm {
    /// Creates a form for `user` checking in below `root` on `date`, with the default changelist
    /// selected and an empty comment.
    pub fn new(user: impl Into<String>, date: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            date: date.into(),
            root: root.into(),
            ..Self::default()
        }
    }

    /// Offers a pending changelist. Entries are offered in the order they are added, after the
    /// default changelist.
    pub fn add_changelist(&mut self, changelist: ChangeList) -> Result<&mut Self, Error> {
        if changelist.id == DEFAULT_CHANGELIST {
            return Err(Error::new(ErrorKind::ReservedId, changelist.id));
        }
        if self.changelists.iter().any(|cl| cl.id == changelist.id) {
            return Err(Error::new(ErrorKind::DuplicateChangeList, changelist.id));
        }
        self.changelists.push(changelist);
        Ok(self)
    }

    /// The pending changelists, without the default one.
    pub fn changelists(&self) -> &[ChangeList] {
        &self.changelists
    }

    /// The user name.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Replaces the user name.
    pub fn set_user(&mut self, user: impl Into<String>) {
        self.user = user.into();
    }

    /// The check-in date, as shown to the user.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Replaces the date.
    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
    }

    /// The root of the tree being checked in.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Replaces the root.
    pub fn set_root(&mut self, root: impl Into<String>) {
        self.root = root.into();
    }

    /// Whether conflicts are resolved automatically.
    pub fn auto_resolve(&self) -> bool {
        self.auto_resolve
    }

    /// Turns automatic conflict resolution on or off.
    pub fn set_auto_resolve(&mut self, auto_resolve: bool) {
        self.auto_resolve = auto_resolve;
    }

    /// The check-in comment.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Replaces the comment with text typed by the user.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// The id of the selected changelist.
    pub fn selected_changelist(&self) -> u32 {
        self.selected
    }

    /// Selects changelist `id` and shows its description as the comment.
    ///
    /// When no listed changelist has that id, as for [`DEFAULT_CHANGELIST`], the comment is
    /// cleared.
    pub fn select_changelist(&mut self, id: u32) {
        self.selected = id;
        self.comment.clear();
        match self.changelists.iter().find(|cl| cl.id == id) {
            Some(changelist) => self.comment.push_str(&changelist.comment),
            None if id != DEFAULT_CHANGELIST => {
                log::debug!("changelist {id} is not pending, clearing the comment");
            }
            None => {}
        }
    }

    /// Finishes the form with the values as they stand.
    pub fn accept(self) -> DialogResult {
        DialogResult::Ok(CheckinInfo {
            user: self.user,
            date: self.date,
            root: self.root,
            auto_resolve: self.auto_resolve,
            changelist: self.selected,
            comment: self.comment,
        })
    }

    /// Abandons the form, discarding every edit.
    pub fn cancel(self) -> DialogResult {
        DialogResult::Cancel
    }
}

/// The details of an accepted check-in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckinInfo {
    /// User name.
    pub user: String,
    /// Check-in date.
    pub date: String,
    /// Root of the tree being checked in.
    pub root: String,
    /// Whether conflicts are resolved automatically.
    pub auto_resolve: bool,
    /// Selected changelist, [`DEFAULT_CHANGELIST`] for the default one.
    pub changelist: u32,
    /// Check-in comment.
    pub comment: String,
}

/// How a check-in form was finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogResult {
    /// The user confirmed the check-in.
    Ok(CheckinInfo),
    /// The user backed out.
    Cancel,
}

impl DialogResult {
    /// The conventional dialog result code: 1 for [`Ok`](Self::Ok), 0 for
    /// [`Cancel`](Self::Cancel).
    pub fn code(&self) -> i32 {
        match self {
            Self::Ok(_) => 1,
            Self::Cancel => 0,
        }
    }

    /// The accepted details, or `None` if the form was cancelled.
    pub fn into_info(self) -> Option<CheckinInfo> {
        match self {
            Self::Ok(info) => Some(info),
            Self::Cancel => None,
        }
    }
}
