use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::core::models::{
    answer::{Insert as AnswerInsert, Query as AnswerQuery, UserAnswer},
    category::{Category, Insert as CategoryInsert, Query as CategoryQuery, Update as CategoryUpdate},
    image::{ImageUpload, Insert as ImageInsert, StoredFile, UploadedFile},
    option::{Insert as OptionInsert, Opt, Query as OptionQuery, Update as OptionUpdate},
    question::{Insert as QuestionInsert, Query as QuestionQuery, Question, Update as QuestionUpdate},
    role::{RoleKind, TokenInsert, VerificationToken},
    stats::{AnswerActivity, AnswerReportRow},
    user::{Insert as UserInsert, User},
    web_connection::{Insert as WebConnectionInsert, Update as WebConnectionUpdate, WebConnection},
};
use crate::core::ports::repository::{AnswerCommon, CategoryCommon, ImageCommon, OptionCommon, QuestionCommon, RoleCommon, Store, TokenCommon, TxStore, UserCommon, WebConnectionCommon};
use crate::core::uploader::Uploader;
use crate::error::Error;

pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1).and_then(|d| d.and_hms_opt(12, 0, 0)).unwrap()
}

#[derive(Debug, Default)]
pub struct MemoryState {
    next_id: i32,
    pub commits: usize,
    pub categories: Vec<Category>,
    pub questions: Vec<Question>,
    pub options: Vec<Opt>,
    pub answers: Vec<UserAnswer>,
    pub images: Vec<ImageUpload>,
    pub users: Vec<User>,
    pub roles: HashMap<(RoleKind, i32), bool>,
    pub tokens: Vec<VerificationToken>,
    pub web_connections: Vec<WebConnection>,
}

impl MemoryState {
    fn id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Repository over shared in-process tables. Clones see the same state, and
/// `commit` only counts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Ref<'_, MemoryState> {
        self.state.borrow()
    }

    pub fn seed_category(&self, name: &str, config_link_id: &str, owner_user_id: i32) -> i32 {
        let mut s = self.state.borrow_mut();
        let id = s.id();
        s.categories.push(Category {
            id,
            name: name.into(),
            created_date: fixed_now(),
            config_link_id: config_link_id.into(),
            owner_user_id,
            is_active: true,
            is_featured: false,
        });
        id
    }

    pub fn seed_question(&self, category_id: i32, key: &str, text: &str) -> i32 {
        let mut s = self.state.borrow_mut();
        let id = s.id();
        s.questions.push(Question {
            id,
            key: key.into(),
            text: text.into(),
            category_id,
        });
        id
    }

    pub fn seed_option(&self, question_id: i32, text: &str) -> i32 {
        let mut s = self.state.borrow_mut();
        let id = s.id();
        s.options.push(Opt { id, text: text.into(), question_id });
        id
    }

    pub fn seed_image(&self, config_link_id: &str, image_name: &str, owner_user_id: i32) -> i32 {
        let mut s = self.state.borrow_mut();
        let id = s.id();
        s.images.push(ImageUpload {
            id,
            folder_name: config_link_id.into(),
            image_name: image_name.into(),
            image_path: format!("/uploads/{}/{}", config_link_id, image_name),
            created_date: fixed_now(),
            config_link_id: config_link_id.into(),
            group_id: None,
            owner_user_id,
            is_active: true,
        });
        id
    }

    pub fn seed_user(&self, email: &str, is_admin: bool) -> i32 {
        let mut s = self.state.borrow_mut();
        let id = s.id();
        s.users.push(User {
            id,
            name: email.into(),
            email: email.into(),
            user_name: email.into(),
            password: String::new(),
            salt: String::new(),
            is_admin,
            created_date: fixed_now(),
            last_login: None,
        });
        id
    }
}

impl CategoryCommon for MemoryStore {
    async fn insert(&mut self, category: CategoryInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.id();
        s.categories.push(Category {
            id,
            name: category.name,
            created_date: category.created_date,
            config_link_id: category.config_link_id,
            owner_user_id: category.owner_user_id,
            is_active: category.is_active,
            is_featured: category.is_featured,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Category>, Error> {
        Ok(self.state.borrow().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn exists(&mut self, id: i32) -> Result<bool, Error> {
        Ok(self.state.borrow().categories.iter().any(|c| c.id == id))
    }

    async fn query(&mut self, query: &CategoryQuery) -> Result<Vec<Category>, Error> {
        let mut list: Vec<Category> = self
            .state
            .borrow()
            .categories
            .iter()
            .filter(|c| query.owner_user_id_eq.map_or(true, |v| c.owner_user_id == v))
            .filter(|c| query.config_link_id_eq.as_ref().map_or(true, |v| &c.config_link_id == v))
            .filter(|c| query.is_featured_eq.map_or(true, |v| c.is_featured == v))
            .filter(|c| query.is_active_eq.map_or(true, |v| c.is_active == v))
            .cloned()
            .collect();
        list.sort_by_key(|c| (c.created_date, c.id));
        Ok(list)
    }

    async fn update(&mut self, id: i32, category: CategoryUpdate) -> Result<u64, Error> {
        let mut s = self.state.borrow_mut();
        match s.categories.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.name = category.name;
                c.config_link_id = category.config_link_id;
                c.is_active = category.is_active;
                c.is_featured = category.is_featured;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let mut s = self.state.borrow_mut();
        let before = s.categories.len();
        s.categories.retain(|c| c.id != id);
        if s.categories.len() == before {
            return Ok(0);
        }
        let question_ids: Vec<i32> = s.questions.iter().filter(|q| q.category_id == id).map(|q| q.id).collect();
        s.questions.retain(|q| q.category_id != id);
        s.options.retain(|o| !question_ids.contains(&o.question_id));
        Ok(1)
    }

    async fn config_link_ids_of_owner(&mut self, owner_user_id: i32) -> Result<Vec<String>, Error> {
        let mut links: Vec<String> = self.state.borrow().categories.iter().filter(|c| c.owner_user_id == owner_user_id).map(|c| c.config_link_id.clone()).collect();
        links.sort();
        links.dedup();
        Ok(links)
    }
}

impl QuestionCommon for MemoryStore {
    async fn insert(&mut self, question: QuestionInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.id();
        s.questions.push(Question {
            id,
            key: question.key,
            text: question.text,
            category_id: question.category_id,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Question>, Error> {
        Ok(self.state.borrow().questions.iter().find(|q| q.id == id).cloned())
    }

    async fn exists(&mut self, id: i32) -> Result<bool, Error> {
        Ok(self.state.borrow().questions.iter().any(|q| q.id == id))
    }

    async fn query(&mut self, query: &QuestionQuery) -> Result<Vec<Question>, Error> {
        let mut list: Vec<Question> = self
            .state
            .borrow()
            .questions
            .iter()
            .filter(|q| query.category_id_eq.map_or(true, |v| q.category_id == v))
            .filter(|q| query.id_in.as_ref().map_or(true, |ids| ids.contains(&q.id)))
            .cloned()
            .collect();
        list.sort_by_key(|q| q.id);
        Ok(list)
    }

    async fn update(&mut self, id: i32, question: QuestionUpdate) -> Result<u64, Error> {
        let mut s = self.state.borrow_mut();
        match s.questions.iter_mut().find(|q| q.id == id) {
            Some(q) => {
                q.key = question.key;
                q.text = question.text;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_text(&mut self, id: i32, text: &str) -> Result<u64, Error> {
        let mut s = self.state.borrow_mut();
        match s.questions.iter_mut().find(|q| q.id == id) {
            Some(q) => {
                q.text = text.to_owned();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let mut s = self.state.borrow_mut();
        let before = s.questions.len();
        s.questions.retain(|q| q.id != id);
        if s.questions.len() == before {
            return Ok(0);
        }
        s.options.retain(|o| o.question_id != id);
        Ok(1)
    }
}

impl OptionCommon for MemoryStore {
    async fn insert(&mut self, option: OptionInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.id();
        s.options.push(Opt {
            id,
            text: option.text,
            question_id: option.question_id,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Opt>, Error> {
        Ok(self.state.borrow().options.iter().find(|o| o.id == id).cloned())
    }

    async fn exists(&mut self, id: i32) -> Result<bool, Error> {
        Ok(self.state.borrow().options.iter().any(|o| o.id == id))
    }

    async fn query(&mut self, query: &OptionQuery) -> Result<Vec<Opt>, Error> {
        let mut list: Vec<Opt> = self
            .state
            .borrow()
            .options
            .iter()
            .filter(|o| query.question_id_eq.map_or(true, |v| o.question_id == v))
            .filter(|o| query.question_id_in.as_ref().map_or(true, |ids| ids.contains(&o.question_id)))
            .cloned()
            .collect();
        list.sort_by_key(|o| o.id);
        Ok(list)
    }

    async fn update(&mut self, id: i32, option: OptionUpdate) -> Result<u64, Error> {
        let mut s = self.state.borrow_mut();
        match s.options.iter_mut().find(|o| o.id == id) {
            Some(o) => {
                o.text = option.text;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let mut s = self.state.borrow_mut();
        let before = s.options.len();
        s.options.retain(|o| o.id != id);
        Ok((before - s.options.len()) as u64)
    }

    async fn is_belongs_to_question(&mut self, question_id: i32, option_id: i32) -> Result<bool, Error> {
        Ok(self.state.borrow().options.iter().any(|o| o.id == option_id && o.question_id == question_id))
    }
}

impl AnswerCommon for MemoryStore {
    async fn insert(&mut self, answer: AnswerInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.id();
        s.answers.push(UserAnswer {
            id,
            user_id: answer.user_id,
            category_id: answer.category_id,
            category_name: answer.category_name,
            question_id: answer.question_id,
            question_key: answer.question_key,
            question_option_id: answer.question_option_id,
            image_name: answer.image_name,
            image_path: answer.image_path,
            is_question_answered: true,
            is_image_answered: false,
            session_id: answer.session_id,
            created_date: answer.created_date,
        });
        Ok(id)
    }

    async fn find(&mut self, user_id: &str, question_id: i32, image_name: &str) -> Result<Option<UserAnswer>, Error> {
        Ok(self
            .state
            .borrow()
            .answers
            .iter()
            .find(|a| a.user_id == user_id && a.question_id == question_id && a.image_name == image_name)
            .cloned())
    }

    async fn update_option(&mut self, id: i32, option_id: i32, image_path: &str) -> Result<(), Error> {
        let mut s = self.state.borrow_mut();
        if let Some(a) = s.answers.iter_mut().find(|a| a.id == id) {
            a.question_option_id = option_id;
            a.image_path = image_path.to_owned();
            a.is_question_answered = true;
        }
        Ok(())
    }

    async fn count_answered_questions(&mut self, user_id: &str, category_id: i32, image_name: &str) -> Result<i64, Error> {
        let s = self.state.borrow();
        let mut ids: Vec<i32> = s
            .answers
            .iter()
            .filter(|a| a.user_id == user_id && a.category_id == category_id && a.image_name == image_name && a.is_question_answered)
            .map(|a| a.question_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids.len() as i64)
    }

    async fn mark_image_answered(&mut self, user_id: &str, category_id: i32, image_name: &str) -> Result<(), Error> {
        let mut s = self.state.borrow_mut();
        for a in s.answers.iter_mut().filter(|a| a.user_id == user_id && a.category_id == category_id && a.image_name == image_name) {
            a.is_image_answered = true;
        }
        Ok(())
    }

    async fn query(&mut self, query: &AnswerQuery) -> Result<Vec<UserAnswer>, Error> {
        Ok(self
            .state
            .borrow()
            .answers
            .iter()
            .filter(|a| query.category_id_eq.map_or(true, |v| a.category_id == v))
            .filter(|a| query.image_name_eq.as_ref().map_or(true, |v| &a.image_name == v))
            .cloned()
            .collect())
    }

    async fn report_rows(&mut self, config_link_ids: &[String]) -> Result<Vec<AnswerReportRow>, Error> {
        let s = self.state.borrow();
        let mut rows = Vec::new();
        for a in &s.answers {
            let Some(c) = s.categories.iter().find(|c| c.id == a.category_id && config_link_ids.contains(&c.config_link_id)) else {
                continue;
            };
            if !s.images.iter().any(|i| i.image_path == a.image_path && i.config_link_id == c.config_link_id) {
                continue;
            }
            let Some(q) = s.questions.iter().find(|q| q.id == a.question_id) else {
                continue;
            };
            let Some(o) = s.options.iter().find(|o| o.id == a.question_option_id) else {
                continue;
            };
            rows.push(AnswerReportRow {
                config_link_id: c.config_link_id.clone(),
                category_id: c.id,
                category_name: c.name.clone(),
                image_name: a.image_name.clone(),
                image_path: a.image_path.clone(),
                question_id: q.id,
                question_text: q.text.clone(),
                option_id: o.id,
                option_text: o.text.clone(),
            });
        }
        Ok(rows)
    }

    async fn activity(&mut self, config_link_id: &str) -> Result<Vec<AnswerActivity>, Error> {
        let s = self.state.borrow();
        Ok(s.answers
            .iter()
            .filter(|a| s.categories.iter().any(|c| c.id == a.category_id && c.config_link_id == config_link_id))
            .map(|a| AnswerActivity {
                user_id: a.user_id.clone(),
                created_date: a.created_date,
            })
            .collect())
    }
}

impl ImageCommon for MemoryStore {
    async fn insert(&mut self, image: ImageInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.id();
        s.images.push(ImageUpload {
            id,
            folder_name: image.folder_name,
            image_name: image.image_name,
            image_path: image.image_path,
            created_date: image.created_date,
            config_link_id: image.config_link_id,
            group_id: image.group_id,
            owner_user_id: image.owner_user_id,
            is_active: true,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<ImageUpload>, Error> {
        Ok(self.state.borrow().images.iter().find(|i| i.id == id).cloned())
    }

    async fn query_by_config_link(&mut self, config_link_id: &str, active_only: bool) -> Result<Vec<ImageUpload>, Error> {
        let mut list: Vec<ImageUpload> = self
            .state
            .borrow()
            .images
            .iter()
            .filter(|i| i.config_link_id == config_link_id && (!active_only || i.is_active))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.image_name.cmp(&b.image_name));
        Ok(list)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let mut s = self.state.borrow_mut();
        let before = s.images.len();
        s.images.retain(|i| i.id != id);
        Ok((before - s.images.len()) as u64)
    }
}

impl UserCommon for MemoryStore {
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        if s.users.iter().any(|u| u.email == user.email) {
            return Err(Error::Conflict(format!("email {} is already registered", user.email)));
        }
        let id = s.id();
        s.users.push(User {
            id,
            name: user.name,
            email: user.email,
            user_name: user.user_name,
            password: user.password,
            salt: user.salt,
            is_admin: false,
            created_date: user.created_date,
            last_login: None,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        Ok(self.state.borrow().users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        Ok(self.state.borrow().users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&mut self) -> Result<Vec<User>, Error> {
        Ok(self.state.borrow().users.clone())
    }

    async fn set_admin(&mut self, id: i32, is_admin: bool) -> Result<u64, Error> {
        let mut s = self.state.borrow_mut();
        match s.users.iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.is_admin = is_admin;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn touch_login(&mut self, id: i32, at: NaiveDateTime) -> Result<(), Error> {
        if let Some(u) = self.state.borrow_mut().users.iter_mut().find(|u| u.id == id) {
            u.last_login = Some(at);
        }
        Ok(())
    }
}

impl RoleCommon for MemoryStore {
    async fn get_role(&mut self, kind: RoleKind, user_id: i32) -> Result<Option<bool>, Error> {
        Ok(self.state.borrow().roles.get(&(kind, user_id)).copied())
    }

    async fn insert_role(&mut self, kind: RoleKind, user_id: i32, trusted: bool) -> Result<(), Error> {
        let mut s = self.state.borrow_mut();
        if s.roles.contains_key(&(kind, user_id)) {
            return Err(Error::Conflict(format!("user {} already has a {} role", user_id, kind)));
        }
        s.roles.insert((kind, user_id), trusted);
        Ok(())
    }

    async fn set_role(&mut self, kind: RoleKind, user_id: i32, trusted: bool) -> Result<u64, Error> {
        match self.state.borrow_mut().roles.get_mut(&(kind, user_id)) {
            Some(v) => {
                *v = trusted;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl TokenCommon for MemoryStore {
    async fn insert(&mut self, token: TokenInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.id();
        s.tokens.push(VerificationToken {
            id,
            user_id: token.user_id,
            kind: token.kind.as_str().to_owned(),
            token: token.token,
            created_at: token.created_at,
            expires_at: token.expires_at,
            verified_at: None,
        });
        Ok(id)
    }

    async fn get_by_token(&mut self, token: &str) -> Result<Option<VerificationToken>, Error> {
        Ok(self.state.borrow().tokens.iter().find(|t| t.token == token).cloned())
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let mut s = self.state.borrow_mut();
        let before = s.tokens.len();
        s.tokens.retain(|t| t.id != id);
        Ok((before - s.tokens.len()) as u64)
    }
}

impl WebConnectionCommon for MemoryStore {
    async fn insert(&mut self, connection: WebConnectionInsert) -> Result<i32, Error> {
        let mut s = self.state.borrow_mut();
        let id = s.id();
        s.web_connections.push(WebConnection {
            id,
            title: connection.title,
            url: connection.url,
            description: connection.description,
            owner_user_id: connection.owner_user_id,
            created_date: connection.created_date,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<WebConnection>, Error> {
        Ok(self.state.borrow().web_connections.iter().find(|w| w.id == id).cloned())
    }

    async fn list(&mut self) -> Result<Vec<WebConnection>, Error> {
        let mut list = self.state.borrow().web_connections.clone();
        list.sort_by(|a, b| b.created_date.cmp(&a.created_date).then(b.id.cmp(&a.id)));
        Ok(list)
    }

    async fn update(&mut self, id: i32, connection: WebConnectionUpdate) -> Result<u64, Error> {
        let mut s = self.state.borrow_mut();
        match s.web_connections.iter_mut().find(|w| w.id == id) {
            Some(w) => {
                w.title = connection.title;
                w.url = connection.url;
                w.description = connection.description;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let mut s = self.state.borrow_mut();
        let before = s.web_connections.len();
        s.web_connections.retain(|w| w.id != id);
        Ok((before - s.web_connections.len()) as u64)
    }
}

impl Store for MemoryStore {}

impl TxStore for MemoryStore {
    async fn commit(self) -> Result<(), Error> {
        self.state.borrow_mut().commits += 1;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}

/// Keeps uploaded files in memory, keyed by public path.
#[derive(Debug, Default)]
pub struct MemoryUploader {
    files: RefCell<HashMap<String, bytes::Bytes>>,
}

impl MemoryUploader {
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.files.borrow().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl Uploader for MemoryUploader {
    async fn put(&self, folder: &str, file: UploadedFile) -> Result<StoredFile, Error> {
        let stored_name = format!("{}.{}", uuid::Uuid::new_v4(), file.extension);
        let public_path = format!("/uploads/{}/{}", folder, stored_name);
        self.files.borrow_mut().insert(public_path.clone(), file.content);
        Ok(StoredFile { stored_name, public_path })
    }

    async fn delete(&self, public_path: &str) -> Result<(), Error> {
        self.files.borrow_mut().remove(public_path);
        Ok(())
    }
}
