//! Core type definitions for the application

use std::time::Instant;

/// Top-level screen currently shown
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Dashboard,
    Admin,
}

/// Dashboard category tab
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    Videos,
    Books,
    Music,
    Playlists,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Videos,
        Category::Books,
        Category::Music,
        Category::Playlists,
    ];

    pub fn next(self) -> Self {
        match self {
            Category::Videos => Category::Books,
            Category::Books => Category::Music,
            Category::Music => Category::Playlists,
            Category::Playlists => Category::Videos,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Category::Videos => Category::Playlists,
            Category::Books => Category::Videos,
            Category::Music => Category::Books,
            Category::Playlists => Category::Music,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Category::Videos => 0,
            Category::Books => 1,
            Category::Music => 2,
            Category::Playlists => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase name, as used in the partial-failure message.
    pub fn key(self) -> &'static str {
        match self {
            Category::Videos => "videos",
            Category::Books => "books",
            Category::Music => "music",
            Category::Playlists => "playlists",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Videos => "Videos",
            Category::Books => "Books",
            Category::Music => "Music",
            Category::Playlists => "Playlists",
        }
    }
}

/// Admin panel section
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AdminSection {
    #[default]
    Videos,
    Books,
    Music,
    Playlists,
    Genres,
    Users,
}

impl AdminSection {
    pub const ALL: [AdminSection; 6] = [
        AdminSection::Videos,
        AdminSection::Books,
        AdminSection::Music,
        AdminSection::Playlists,
        AdminSection::Genres,
        AdminSection::Users,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::Videos => Self::Books,
            Self::Books => Self::Music,
            Self::Music => Self::Playlists,
            Self::Playlists => Self::Genres,
            Self::Genres => Self::Users,
            Self::Users => Self::Videos,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Videos => Self::Users,
            Self::Books => Self::Videos,
            Self::Music => Self::Books,
            Self::Playlists => Self::Music,
            Self::Genres => Self::Playlists,
            Self::Users => Self::Genres,
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Videos => "Videos",
            Self::Books => "Books",
            Self::Music => "Music",
            Self::Playlists => "Playlists",
            Self::Genres => "Genres",
            Self::Users => "Users",
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Videos => &["ID", "Title", "Status"],
            Self::Books => &["ID", "Title", "Author"],
            Self::Music => &["ID", "Title", "Description"],
            Self::Playlists => &["ID", "Title", "Description"],
            Self::Genres => &["ID", "Name", "Type"],
            Self::Users => &["ID", "Full name", "Phone", "Role"],
        }
    }

    /// Sections whose rows can be edited in place.
    pub fn supports_edit(self) -> bool {
        matches!(self, Self::Videos | Self::Books | Self::Genres | Self::Users)
    }
}

/// Which login input has focus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Phone,
    Password,
}

impl LoginField {
    pub fn toggle(self) -> Self {
        match self {
            LoginField::Phone => LoginField::Password,
            LoginField::Password => LoginField::Phone,
        }
    }
}

pub const PHONE_PREFIX: &str = "+7";

#[derive(Clone, Debug)]
pub struct LoginState {
    pub phone: String,
    pub password: String,
    pub focus: LoginField,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Default for LoginState {
    fn default() -> Self {
        Self {
            phone: PHONE_PREFIX.to_string(),
            password: String::new(),
            focus: LoginField::Phone,
            submitting: false,
            error: None,
        }
    }
}

impl LoginState {
    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Phone => &mut self.phone,
            LoginField::Password => &mut self.password,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Outcome banner shown after an admin mutation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, text: text.into() }
    }
}

/// A delete waiting for y/n confirmation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub section: AdminSection,
    pub id: String,
    pub label: String,
}

impl ConfirmPrompt {
    pub fn message(&self) -> String {
        format!("Delete {} \"{}\"? (y/n)", self.section.label().to_lowercase(), self.label)
    }
}

/// UI state shared across screens
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub screen: Screen,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_cycles_both_ways() {
        for category in Category::ALL {
            assert_eq!(category.next().prev(), category);
            assert_eq!(Category::from_index(category.index()), Some(category));
        }
        assert_eq!(Category::Playlists.next(), Category::Videos);
        assert_eq!(Category::from_index(4), None);
    }

    #[test]
    fn admin_section_cycles_through_all_six() {
        let mut section = AdminSection::Videos;
        for expected in AdminSection::ALL.iter().skip(1) {
            section = section.next();
            assert_eq!(section, *expected);
        }
        assert_eq!(section.next(), AdminSection::Videos);
        assert_eq!(AdminSection::Videos.prev(), AdminSection::Users);
        assert_eq!(AdminSection::Genres.index(), 4);
    }

    #[test]
    fn only_some_sections_are_editable() {
        assert!(AdminSection::Videos.supports_edit());
        assert!(AdminSection::Users.supports_edit());
        assert!(!AdminSection::Music.supports_edit());
        assert!(!AdminSection::Playlists.supports_edit());
    }

    #[test]
    fn login_starts_with_phone_prefix() {
        let mut login = LoginState::default();
        assert_eq!(login.phone, "+7");
        login.focused_value_mut().push('9');
        assert_eq!(login.phone, "+79");
        login.focus = login.focus.toggle();
        login.focused_value_mut().push('x');
        assert_eq!(login.password, "x");
    }
}
