//! Dashboard and admin content state

use super::entities::{
    Book, Genre, Music, Playlist, Profile, SearchHit, SearchKind, User, Video, non_empty,
};
use super::forms::FormState;
use super::types::{AdminSection, Category, ConfirmPrompt, Notice};

/// A dashboard card, whichever category it came from
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogItem {
    Video(Video),
    Book(Book),
    Music(Music),
    Playlist(Playlist),
}

/// Secondary lookup used when a card carries no usable preview URL
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewLookup {
    VideoPlay,
    MusicLinks,
    BookLinks,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewPlan {
    pub direct: Option<String>,
    pub lookup: Option<PreviewLookup>,
}

impl CatalogItem {
    pub fn id(&self) -> &str {
        match self {
            CatalogItem::Video(v) => &v.id,
            CatalogItem::Book(b) => &b.id,
            CatalogItem::Music(m) => &m.id,
            CatalogItem::Playlist(p) => &p.id,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            CatalogItem::Video(_) => Category::Videos,
            CatalogItem::Book(_) => Category::Books,
            CatalogItem::Music(_) => Category::Music,
            CatalogItem::Playlist(_) => Category::Playlists,
        }
    }

    fn raw_title(&self) -> &str {
        match self {
            CatalogItem::Video(v) => &v.title,
            CatalogItem::Book(b) => &b.title,
            CatalogItem::Music(m) => &m.title,
            CatalogItem::Playlist(p) => &p.title,
        }
    }

    fn raw_name(&self) -> Option<&str> {
        match self {
            CatalogItem::Playlist(p) => p.name.as_deref(),
            _ => None,
        }
    }

    pub fn title(&self) -> &str {
        non_empty(Some(self.raw_title()))
            .or_else(|| non_empty(self.raw_name()))
            .unwrap_or("Untitled")
    }

    pub fn description(&self) -> &str {
        let description = match self {
            CatalogItem::Video(v) => &v.description,
            CatalogItem::Book(b) => &b.description,
            CatalogItem::Music(m) => &m.description,
            CatalogItem::Playlist(p) => &p.description,
        };
        let author = match self {
            CatalogItem::Book(b) => Some(b.author.as_str()),
            _ => None,
        };
        non_empty(Some(description))
            .or_else(|| non_empty(author))
            .unwrap_or("")
    }

    pub fn preview_field(&self) -> Option<&str> {
        let value = match self {
            CatalogItem::Video(v) => Some(v.preview_img.as_str()),
            CatalogItem::Book(b) => b.cover_url.as_deref(),
            CatalogItem::Music(m) => Some(m.preview_img.as_str()),
            CatalogItem::Playlist(p) => Some(p.preview_img.as_str()),
        };
        non_empty(value)
    }

    /// Where the preview comes from. Absolute URLs are used as-is; anything
    /// else is a storage key that only the backend can resolve.
    pub fn preview_plan(&self) -> PreviewPlan {
        let field = self.preview_field();
        let absolute = field.filter(|p| p.starts_with("http")).map(str::to_string);
        match self {
            CatalogItem::Video(_) => PreviewPlan {
                lookup: absolute.is_none().then_some(PreviewLookup::VideoPlay),
                direct: absolute,
            },
            CatalogItem::Music(_) => PreviewPlan {
                lookup: absolute.is_none().then_some(PreviewLookup::MusicLinks),
                direct: absolute,
            },
            CatalogItem::Book(_) => PreviewPlan {
                lookup: absolute.is_none().then_some(PreviewLookup::BookLinks),
                direct: absolute,
            },
            CatalogItem::Playlist(_) => PreviewPlan {
                direct: field.map(str::to_string),
                lookup: None,
            },
        }
    }

    /// Playlists only list their tracks; everything else can be opened.
    pub fn is_openable(&self) -> bool {
        !matches!(self, CatalogItem::Playlist(_))
    }

    pub fn meta_line(&self) -> String {
        match self {
            CatalogItem::Video(v) => format!("Status: {}", v.status.as_str()),
            CatalogItem::Book(b) => match b.published_year {
                Some(year) => format!("{} · {}", b.author, year),
                None => b.author.clone(),
            },
            CatalogItem::Music(m) => format!("Duration: {}", format_duration(m.duration)),
            CatalogItem::Playlist(p) => format!("{} tracks", p.musics.len()),
        }
    }
}

pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Preview resolved for a particular card
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreviewSlot {
    pub item_id: String,
    pub url: Option<String>,
    pub resolved: bool,
}

/// The card currently expanded with Enter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenCard {
    pub category: Category,
    pub item_id: String,
    pub location: Option<String>,
    pub from_manifest: bool,
    pub launch_error: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct SearchState {
    pub prompt_open: bool,
    pub query: String,
    pub results: Vec<SearchHit>,
    pub selected: usize,
    pub visible: bool,
    pub loading: bool,
}

#[derive(Clone, Debug, Default)]
pub struct DashboardState {
    pub profile: Option<Profile>,
    pub videos: Vec<Video>,
    pub books: Vec<Book>,
    pub music: Vec<Music>,
    pub playlists: Vec<Playlist>,
    pub category: Category,
    pub selected: [usize; 4],
    pub loading: bool,
    pub load_error: Option<String>,
    pub preview: PreviewSlot,
    pub open: Option<OpenCard>,
    pub search: SearchState,
}

impl DashboardState {
    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Videos => self.videos.len(),
            Category::Books => self.books.len(),
            Category::Music => self.music.len(),
            Category::Playlists => self.playlists.len(),
        }
    }

    pub fn item(&self, category: Category, index: usize) -> Option<CatalogItem> {
        match category {
            Category::Videos => self.videos.get(index).cloned().map(CatalogItem::Video),
            Category::Books => self.books.get(index).cloned().map(CatalogItem::Book),
            Category::Music => self.music.get(index).cloned().map(CatalogItem::Music),
            Category::Playlists => self.playlists.get(index).cloned().map(CatalogItem::Playlist),
        }
    }

    pub fn items(&self, category: Category) -> Vec<CatalogItem> {
        (0..self.len(category))
            .filter_map(|i| self.item(category, i))
            .collect()
    }

    pub fn selected_index(&self) -> usize {
        self.selected[self.category.index()]
    }

    pub fn selected_item(&self) -> Option<CatalogItem> {
        self.item(self.category, self.selected_index())
    }

    pub fn move_up(&mut self) {
        let slot = &mut self.selected[self.category.index()];
        *slot = slot.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.len(self.category);
        let slot = &mut self.selected[self.category.index()];
        if *slot + 1 < len {
            *slot += 1;
        }
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    /// Select the card with `id` in `category`. Returns false when the list
    /// does not contain it.
    pub fn select_by_id(&mut self, category: Category, id: &str) -> bool {
        let position = self.items(category).iter().position(|item| item.id() == id);
        match position {
            Some(index) => {
                self.category = category;
                self.selected[category.index()] = index;
                true
            }
            None => false,
        }
    }

    /// Keep selections inside the freshly loaded lists.
    pub fn clamp_selection(&mut self) {
        for category in Category::ALL {
            let len = self.len(category);
            let slot = &mut self.selected[category.index()];
            if *slot >= len {
                *slot = len.saturating_sub(1);
            }
        }
    }

    pub fn is_open(&self, item_id: &str) -> bool {
        self.open.as_ref().is_some_and(|card| card.item_id == item_id)
    }
}

impl SearchKind {
    pub fn category(self) -> Category {
        match self {
            SearchKind::Book => Category::Books,
            SearchKind::Video => Category::Videos,
            SearchKind::Music => Category::Music,
        }
    }
}

/// Every list the admin panel manages
#[derive(Clone, Debug, Default)]
pub struct AdminLists {
    pub videos: Vec<Video>,
    pub books: Vec<Book>,
    pub music: Vec<Music>,
    pub playlists: Vec<Playlist>,
    pub genres: Vec<Genre>,
    pub users: Vec<User>,
}

impl AdminLists {
    pub fn len(&self, section: AdminSection) -> usize {
        match section {
            AdminSection::Videos => self.videos.len(),
            AdminSection::Books => self.books.len(),
            AdminSection::Music => self.music.len(),
            AdminSection::Playlists => self.playlists.len(),
            AdminSection::Genres => self.genres.len(),
            AdminSection::Users => self.users.len(),
        }
    }

    /// Table cells for one section, matching `AdminSection::columns`.
    pub fn rows(&self, section: AdminSection) -> Vec<Vec<String>> {
        match section {
            AdminSection::Videos => self
                .videos
                .iter()
                .map(|v| vec![v.id.clone(), v.title.clone(), v.status.as_str().to_string()])
                .collect(),
            AdminSection::Books => self
                .books
                .iter()
                .map(|b| vec![b.id.clone(), b.title.clone(), b.author.clone()])
                .collect(),
            AdminSection::Music => self
                .music
                .iter()
                .map(|m| vec![m.id.clone(), m.title.clone(), m.description.clone()])
                .collect(),
            AdminSection::Playlists => self
                .playlists
                .iter()
                .map(|p| vec![p.id.clone(), p.title.clone(), p.description.clone()])
                .collect(),
            AdminSection::Genres => self
                .genres
                .iter()
                .map(|g| vec![g.id.clone(), g.name.clone(), g.kind.as_str().to_string()])
                .collect(),
            AdminSection::Users => self
                .users
                .iter()
                .map(|u| {
                    vec![
                        u.id.clone(),
                        u.fullname.clone(),
                        u.phone.clone(),
                        u.role.as_str().to_string(),
                    ]
                })
                .collect(),
        }
    }

    /// Id and a human label for the row at `index`.
    pub fn row_identity(&self, section: AdminSection, index: usize) -> Option<(String, String)> {
        match section {
            AdminSection::Videos => self.videos.get(index).map(|v| (v.id.clone(), v.title.clone())),
            AdminSection::Books => self.books.get(index).map(|b| (b.id.clone(), b.title.clone())),
            AdminSection::Music => self.music.get(index).map(|m| (m.id.clone(), m.title.clone())),
            AdminSection::Playlists => {
                self.playlists.get(index).map(|p| (p.id.clone(), p.title.clone()))
            }
            AdminSection::Genres => self.genres.get(index).map(|g| (g.id.clone(), g.name.clone())),
            AdminSection::Users => self.users.get(index).map(|u| (u.id.clone(), u.fullname.clone())),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AdminState {
    pub lists: AdminLists,
    pub section: AdminSection,
    pub selected: [usize; 6],
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<Notice>,
    pub confirm: Option<ConfirmPrompt>,
    pub form: Option<FormState>,
}

impl AdminState {
    pub fn selected_index(&self) -> usize {
        self.selected[self.section.index()]
    }

    pub fn selected_identity(&self) -> Option<(String, String)> {
        self.lists.row_identity(self.section, self.selected_index())
    }

    pub fn move_up(&mut self) {
        let slot = &mut self.selected[self.section.index()];
        *slot = slot.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.lists.len(self.section);
        let slot = &mut self.selected[self.section.index()];
        if *slot + 1 < len {
            *slot += 1;
        }
    }

    pub fn replace_lists(&mut self, lists: AdminLists) {
        self.lists = lists;
        for section in AdminSection::ALL {
            let len = self.lists.len(section);
            let slot = &mut self.selected[section.index()];
            if *slot >= len {
                *slot = len.saturating_sub(1);
            }
        }
    }
}
