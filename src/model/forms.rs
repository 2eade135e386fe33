//! Admin create/edit forms and the mutations they submit
//!
//! A form is a flat list of labelled text fields. Submitting validates it
//! locally and turns it into a [`Mutation`]; nothing is sent when validation
//! fails.

use super::entities::{Book, Genre, GenreType, Role, User, Video, VideoStatus};
use super::error::{ApiError, ApiResult};
use super::requests::{
    BookPatch, BookUpload, GenreDraft, GenrePatch, MusicUpload, PlaylistUpload, UploadFile,
    UserDraft, UserPatch, VideoPatch, VideoUpload,
};
use super::types::{AdminSection, PHONE_PREFIX};

const GENRE_TYPES: &[&str] = &["music", "movie", "book"];
const ROLES: &[&str] = &["user", "admin"];
const VIDEO_STATUSES: &[&str] = &["", "ACTIVE", "ARCHIVED"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormKind {
    CreateVideo,
    UpdateVideo { id: String },
    CreateBook,
    UpdateBook { id: String },
    CreateMusic,
    CreatePlaylist,
    CreateGenre,
    UpdateGenre { id: String },
    CreateUser,
    UpdateUser { id: String },
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            FormKind::CreateVideo => "New video",
            FormKind::UpdateVideo { .. } => "Edit video",
            FormKind::CreateBook => "New book",
            FormKind::UpdateBook { .. } => "Edit book",
            FormKind::CreateMusic => "New track",
            FormKind::CreatePlaylist => "New playlist",
            FormKind::CreateGenre => "New genre",
            FormKind::UpdateGenre { .. } => "Edit genre",
            FormKind::CreateUser => "New user",
            FormKind::UpdateUser { .. } => "Edit user",
        }
    }

    /// Id of the row being edited, if any.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            FormKind::UpdateVideo { id }
            | FormKind::UpdateBook { id }
            | FormKind::UpdateGenre { id }
            | FormKind::UpdateUser { id } => Some(id),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Number,
    /// Local file to upload.
    File,
    Choice(&'static [&'static str]),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
}

impl FormField {
    fn new(key: &'static str, label: &'static str, kind: FieldKind, required: bool) -> Self {
        let value = match kind {
            FieldKind::Choice(choices) => choices.first().map(|c| c.to_string()).unwrap_or_default(),
            _ => String::new(),
        };
        Self { key, label, kind, required, value }
    }

    fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text, true)
    }

    fn optional(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text, false)
    }

    fn with(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, FieldKind::Choice(_))
    }

    /// Step a choice field forwards or backwards, wrapping around.
    pub fn cycle(&mut self, forward: bool) {
        if let FieldKind::Choice(choices) = self.kind {
            if choices.is_empty() {
                return;
            }
            let current = choices.iter().position(|c| *c == self.value).unwrap_or(0);
            let next = if forward {
                (current + 1) % choices.len()
            } else {
                (current + choices.len() - 1) % choices.len()
            };
            self.value = choices[next].to_string();
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

impl FormState {
    fn new(kind: FormKind, fields: Vec<FormField>) -> Self {
        Self { kind, fields, focus: 0, error: None, submitting: false }
    }

    /// Empty create form for a section.
    pub fn create(section: AdminSection) -> Self {
        match section {
            AdminSection::Videos => Self::new(
                FormKind::CreateVideo,
                vec![
                    FormField::text("title", "Title"),
                    FormField::text("description", "Description"),
                    FormField::optional("genre_id", "Genre id"),
                    FormField::new("preview", "Preview image", FieldKind::File, true),
                    FormField::new("file", "Video file", FieldKind::File, true),
                ],
            ),
            AdminSection::Books => Self::new(
                FormKind::CreateBook,
                vec![
                    FormField::text("title", "Title"),
                    FormField::text("author", "Author"),
                    FormField::text("description", "Description"),
                    FormField::optional("genre", "Genre"),
                    FormField::new("published_year", "Published year", FieldKind::Number, false),
                    FormField::new("file", "Book file", FieldKind::File, true),
                    FormField::new("cover", "Cover image", FieldKind::File, false),
                ],
            ),
            AdminSection::Music => Self::new(
                FormKind::CreateMusic,
                vec![
                    FormField::text("playlist_id", "Playlist id"),
                    FormField::text("title", "Title"),
                    FormField::text("description", "Description"),
                    FormField::optional("genre_id", "Genre id"),
                    FormField::new("preview_img", "Preview image", FieldKind::File, true),
                    FormField::new("music", "Audio file", FieldKind::File, true),
                ],
            ),
            AdminSection::Playlists => Self::new(
                FormKind::CreatePlaylist,
                vec![
                    FormField::text("title", "Title"),
                    FormField::text("description", "Description"),
                    FormField::new("preview_img", "Preview image", FieldKind::File, true),
                ],
            ),
            AdminSection::Genres => Self::new(
                FormKind::CreateGenre,
                vec![
                    FormField::text("name", "Name"),
                    FormField::new("type", "Type", FieldKind::Choice(GENRE_TYPES), true),
                ],
            ),
            AdminSection::Users => Self::new(
                FormKind::CreateUser,
                vec![
                    FormField::text("fullname", "Full name"),
                    FormField::text("phone", "Phone").with(PHONE_PREFIX),
                    FormField::new("password", "Password", FieldKind::Secret, true),
                    FormField::new("role", "Role", FieldKind::Choice(ROLES), true),
                ],
            ),
        }
    }

    pub fn edit_video(video: &Video) -> Self {
        let status = match video.status {
            VideoStatus::Active | VideoStatus::Archived => video.status.as_str(),
            _ => "",
        };
        Self::new(
            FormKind::UpdateVideo { id: video.id.clone() },
            vec![
                FormField::optional("title", "Title").with(&video.title),
                FormField::optional("description", "Description").with(&video.description),
                FormField::new("status", "Status", FieldKind::Choice(VIDEO_STATUSES), false)
                    .with(status),
                FormField::optional("genre_id", "Genre id")
                    .with(video.genre_id.clone().unwrap_or_default()),
            ],
        )
    }

    pub fn edit_book(book: &Book) -> Self {
        Self::new(
            FormKind::UpdateBook { id: book.id.clone() },
            vec![
                FormField::optional("title", "Title").with(&book.title),
                FormField::optional("author", "Author").with(&book.author),
                FormField::optional("description", "Description").with(&book.description),
                FormField::optional("genre", "Genre").with(book.genre.clone().unwrap_or_default()),
                FormField::new("published_year", "Published year", FieldKind::Number, false)
                    .with(book.published_year.map(|y| y.to_string()).unwrap_or_default()),
            ],
        )
    }

    pub fn edit_genre(genre: &Genre) -> Self {
        Self::new(
            FormKind::UpdateGenre { id: genre.id.clone() },
            vec![
                FormField::optional("name", "Name").with(&genre.name),
                FormField::optional("description", "Description")
                    .with(genre.description.clone().unwrap_or_default()),
                FormField::new("type", "Type", FieldKind::Choice(GENRE_TYPES), true)
                    .with(genre.kind.as_str()),
            ],
        )
    }

    pub fn edit_user(user: &User) -> Self {
        Self::new(
            FormKind::UpdateUser { id: user.id.clone() },
            vec![
                FormField::optional("fullname", "Full name").with(&user.fullname),
                FormField::optional("phone", "Phone").with(&user.phone),
                FormField::new("password", "New password", FieldKind::Secret, false),
                FormField::new("role", "Role", FieldKind::Choice(ROLES), true)
                    .with(user.role.as_str()),
            ],
        )
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn focused_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.focus)
    }

    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.trim())
            .unwrap_or("")
    }

    fn optional_value(&self, key: &str) -> Option<String> {
        let value = self.value(key);
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Local checks that need no I/O.
    pub fn validate(&self) -> ApiResult<()> {
        for field in &self.fields {
            let value = field.value.trim();
            if field.required && value.is_empty() {
                return Err(ApiError::InvalidInput(format!("{} is required", field.label)));
            }
            if field.kind == FieldKind::Number && !value.is_empty() && value.parse::<i32>().is_err() {
                return Err(ApiError::InvalidInput(format!("{} must be a number", field.label)));
            }
        }
        Ok(())
    }

    fn year(&self) -> Option<i32> {
        self.value("published_year").parse().ok()
    }

    async fn upload(&self, key: &str) -> ApiResult<UploadFile> {
        UploadFile::load(self.value(key)).await
    }

    async fn optional_upload(&self, key: &str) -> ApiResult<Option<UploadFile>> {
        match self.optional_value(key) {
            Some(path) => UploadFile::load(path).await.map(Some),
            None => Ok(None),
        }
    }

    /// Validate and build the request. Upload files are read here so an
    /// unreadable path is reported before anything is sent.
    pub async fn into_mutation(&self) -> ApiResult<Mutation> {
        self.validate()?;
        let mutation = match &self.kind {
            FormKind::CreateVideo => Mutation::CreateVideo(VideoUpload {
                title: self.value("title").to_string(),
                description: self.value("description").to_string(),
                genre_id: self.optional_value("genre_id"),
                preview: self.upload("preview").await?,
                file: self.upload("file").await?,
            }),
            FormKind::UpdateVideo { id } => Mutation::UpdateVideo(
                id.clone(),
                VideoPatch {
                    title: self.optional_value("title"),
                    description: self.optional_value("description"),
                    status: match self.value("status") {
                        "ACTIVE" => Some(VideoStatus::Active),
                        "ARCHIVED" => Some(VideoStatus::Archived),
                        _ => None,
                    },
                    genre_id: self.optional_value("genre_id"),
                },
            ),
            FormKind::CreateBook => Mutation::CreateBook(BookUpload {
                title: self.value("title").to_string(),
                author: self.value("author").to_string(),
                description: self.value("description").to_string(),
                genre: self.optional_value("genre"),
                published_year: self.year(),
                file: self.upload("file").await?,
                cover: self.optional_upload("cover").await?,
            }),
            FormKind::UpdateBook { id } => Mutation::UpdateBook(
                id.clone(),
                BookPatch {
                    title: self.optional_value("title"),
                    author: self.optional_value("author"),
                    description: self.optional_value("description"),
                    genre: self.optional_value("genre"),
                    published_year: self.year(),
                },
            ),
            FormKind::CreateMusic => Mutation::CreateMusic(MusicUpload {
                playlist_id: self.value("playlist_id").to_string(),
                title: self.value("title").to_string(),
                description: self.value("description").to_string(),
                genre_id: self.optional_value("genre_id"),
                preview_img: self.upload("preview_img").await?,
                music: self.upload("music").await?,
            }),
            FormKind::CreatePlaylist => Mutation::CreatePlaylist(PlaylistUpload {
                title: self.value("title").to_string(),
                description: self.value("description").to_string(),
                preview_img: self.upload("preview_img").await?,
            }),
            FormKind::CreateGenre => Mutation::CreateGenre(GenreDraft {
                name: self.value("name").to_string(),
                kind: self.genre_type()?,
                description: None,
            }),
            FormKind::UpdateGenre { id } => Mutation::UpdateGenre(
                id.clone(),
                GenrePatch {
                    name: self.optional_value("name"),
                    description: self.optional_value("description"),
                    kind: Some(self.genre_type()?),
                },
            ),
            FormKind::CreateUser => Mutation::CreateUser(UserDraft {
                fullname: self.value("fullname").to_string(),
                phone: self.value("phone").to_string(),
                password: self.value("password").to_string(),
                role: self.role()?,
            }),
            FormKind::UpdateUser { id } => Mutation::UpdateUser(
                id.clone(),
                UserPatch {
                    fullname: self.optional_value("fullname"),
                    phone: self.optional_value("phone"),
                    password: self.optional_value("password"),
                    role: Some(self.role()?),
                },
            ),
        };
        Ok(mutation)
    }

    fn genre_type(&self) -> ApiResult<GenreType> {
        GenreType::parse(self.value("type"))
            .ok_or_else(|| ApiError::InvalidInput("Unknown genre type".to_string()))
    }

    fn role(&self) -> ApiResult<Role> {
        Role::parse(self.value("role")).ok_or_else(|| ApiError::InvalidInput("Unknown role".to_string()))
    }
}

/// A single admin write, ready to send
#[derive(Debug)]
pub enum Mutation {
    CreateVideo(VideoUpload),
    UpdateVideo(String, VideoPatch),
    DeleteVideo(String),
    ArchiveVideo(String),
    RestoreVideo(String),
    CreateBook(BookUpload),
    UpdateBook(String, BookPatch),
    DeleteBook(String),
    CreateMusic(MusicUpload),
    DeleteMusic(String),
    CreatePlaylist(PlaylistUpload),
    DeletePlaylist(String),
    CreateGenre(GenreDraft),
    UpdateGenre(String, GenrePatch),
    DeleteGenre(String),
    CreateUser(UserDraft),
    UpdateUser(String, UserPatch),
    DeleteUser(String),
}

impl Mutation {
    pub fn delete(section: AdminSection, id: String) -> Self {
        match section {
            AdminSection::Videos => Mutation::DeleteVideo(id),
            AdminSection::Books => Mutation::DeleteBook(id),
            AdminSection::Music => Mutation::DeleteMusic(id),
            AdminSection::Playlists => Mutation::DeletePlaylist(id),
            AdminSection::Genres => Mutation::DeleteGenre(id),
            AdminSection::Users => Mutation::DeleteUser(id),
        }
    }

    pub fn success_text(&self) -> &'static str {
        match self {
            Mutation::CreateVideo(_) => "Video created",
            Mutation::UpdateVideo(..) => "Video updated",
            Mutation::DeleteVideo(_) => "Video deleted",
            Mutation::ArchiveVideo(_) => "Video archived",
            Mutation::RestoreVideo(_) => "Video restored",
            Mutation::CreateBook(_) => "Book created",
            Mutation::UpdateBook(..) => "Book updated",
            Mutation::DeleteBook(_) => "Book deleted",
            Mutation::CreateMusic(_) => "Music created",
            Mutation::DeleteMusic(_) => "Music deleted",
            Mutation::CreatePlaylist(_) => "Playlist created",
            Mutation::DeletePlaylist(_) => "Playlist deleted",
            Mutation::CreateGenre(_) => "Genre created",
            Mutation::UpdateGenre(..) => "Genre updated",
            Mutation::DeleteGenre(_) => "Genre deleted",
            Mutation::CreateUser(_) => "User created",
            Mutation::UpdateUser(..) => "User updated",
            Mutation::DeleteUser(_) => "User deleted",
        }
    }

    /// Id of the row an update or delete touches.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Mutation::UpdateVideo(id, _)
            | Mutation::DeleteVideo(id)
            | Mutation::UpdateBook(id, _)
            | Mutation::DeleteBook(id)
            | Mutation::DeleteMusic(id)
            | Mutation::DeletePlaylist(id)
            | Mutation::UpdateGenre(id, _)
            | Mutation::DeleteGenre(id)
            | Mutation::UpdateUser(id, _)
            | Mutation::DeleteUser(id) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(form: &mut FormState, key: &str, value: &str) {
        let field = form.fields.iter_mut().find(|f| f.key == key).unwrap();
        field.value = value.to_string();
    }

    #[test]
    fn required_fields_are_enforced() {
        let form = FormState::create(AdminSection::Playlists);
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn year_must_be_numeric() {
        let mut form = FormState::edit_book(&Book { id: "b1".into(), ..Default::default() });
        set(&mut form, "published_year", "nineteen");
        assert_eq!(form.validate().unwrap_err().to_string(), "Published year must be a number");
        set(&mut form, "published_year", "1965");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn create_user_prefills_phone_and_cycles_role() {
        let mut form = FormState::create(AdminSection::Users);
        assert_eq!(form.value("phone"), "+7");
        assert_eq!(form.value("role"), "user");
        let role = form.fields.iter_mut().find(|f| f.key == "role").unwrap();
        role.cycle(true);
        assert_eq!(role.value, "admin");
        role.cycle(true);
        assert_eq!(role.value, "user");
        role.cycle(false);
        assert_eq!(role.value, "admin");
    }

    #[test]
    fn focus_wraps() {
        let mut form = FormState::create(AdminSection::Genres);
        form.focus_prev();
        assert_eq!(form.focus, 1);
        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    #[tokio::test]
    async fn genre_form_builds_draft() {
        let mut form = FormState::create(AdminSection::Genres);
        set(&mut form, "name", "Jazz");
        set(&mut form, "type", "music");
        match form.into_mutation().await.unwrap() {
            Mutation::CreateGenre(draft) => {
                assert_eq!(draft.name, "Jazz");
                assert_eq!(draft.kind, GenreType::Music);
            }
            other => panic!("unexpected mutation {other:?}"),
        }
    }

    #[tokio::test]
    async fn edit_user_omits_blank_password() {
        let user = User {
            id: "u1".into(),
            fullname: "Ada".into(),
            phone: "+7001".into(),
            role: Role::Admin,
        };
        let form = FormState::edit_user(&user);
        let mutation = form.into_mutation().await.unwrap();
        assert_eq!(mutation.target_id(), Some("u1"));
        assert_eq!(mutation.success_text(), "User updated");
        match mutation {
            Mutation::UpdateUser(_, patch) => {
                assert_eq!(patch.password, None);
                assert_eq!(patch.role, Some(Role::Admin));
                assert_eq!(patch.fullname.as_deref(), Some("Ada"));
            }
            other => panic!("unexpected mutation {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreadable_upload_fails_before_sending() {
        let mut form = FormState::create(AdminSection::Playlists);
        set(&mut form, "title", "Mix");
        set(&mut form, "description", "Road");
        set(&mut form, "preview_img", "/no/such/cover.png");
        let err = form.into_mutation().await.unwrap_err();
        assert!(matches!(err, ApiError::Io { .. }));
    }

    #[tokio::test]
    async fn video_upload_reads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let preview = dir.path().join("p.png");
        let clip = dir.path().join("clip.mp4");
        std::fs::write(&preview, b"img").unwrap();
        std::fs::write(&clip, b"vid").unwrap();

        let mut form = FormState::create(AdminSection::Videos);
        set(&mut form, "title", "Intro");
        set(&mut form, "description", "First");
        set(&mut form, "preview", preview.to_str().unwrap());
        set(&mut form, "file", clip.to_str().unwrap());

        match form.into_mutation().await.unwrap() {
            Mutation::CreateVideo(upload) => {
                assert_eq!(upload.genre_id, None);
                assert_eq!(upload.preview.file_name, "p.png");
                assert_eq!(upload.file.mime, "video/mp4");
            }
            other => panic!("unexpected mutation {other:?}"),
        }
    }

    #[test]
    fn edit_video_keeps_only_settable_status() {
        let video = Video {
            id: "v1".into(),
            status: VideoStatus::Processing,
            ..Default::default()
        };
        assert_eq!(FormState::edit_video(&video).value("status"), "");
        let active = Video { status: VideoStatus::Active, ..video };
        assert_eq!(FormState::edit_video(&active).value("status"), "ACTIVE");
    }
}
