use chrono::NaiveDateTime;

use crate::core::models::{
    answer::{Insert as AnswerInsert, Query as AnswerQuery, UserAnswer},
    category::{Category, Insert as CategoryInsert, Query as CategoryQuery, Update as CategoryUpdate},
    image::{ImageUpload, Insert as ImageInsert},
    option::{Insert as OptionInsert, Opt, Query as OptionQuery, Update as OptionUpdate},
    question::{Insert as QuestionInsert, Query as QuestionQuery, Question, Update as QuestionUpdate},
    role::{RoleKind, TokenInsert, VerificationToken},
    stats::{AnswerActivity, AnswerReportRow},
    user::{Insert as UserInsert, User},
    web_connection::{Insert as WebConnectionInsert, Update as WebConnectionUpdate, WebConnection},
};
use crate::error::Error;

pub trait CategoryCommon {
    async fn insert(&mut self, category: CategoryInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Category>, Error>;
    async fn exists(&mut self, id: i32) -> Result<bool, Error>;
    /// Ordered by creation date, then id.
    async fn query(&mut self, query: &CategoryQuery) -> Result<Vec<Category>, Error>;
    async fn update(&mut self, id: i32, category: CategoryUpdate) -> Result<u64, Error>;
    async fn delete(&mut self, id: i32) -> Result<u64, Error>;
    async fn config_link_ids_of_owner(&mut self, owner_user_id: i32) -> Result<Vec<String>, Error>;
}

pub trait QuestionCommon {
    async fn insert(&mut self, question: QuestionInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Question>, Error>;
    async fn exists(&mut self, id: i32) -> Result<bool, Error>;
    /// Ordered by id.
    async fn query(&mut self, query: &QuestionQuery) -> Result<Vec<Question>, Error>;
    async fn update(&mut self, id: i32, question: QuestionUpdate) -> Result<u64, Error>;
    async fn update_text(&mut self, id: i32, text: &str) -> Result<u64, Error>;
    async fn delete(&mut self, id: i32) -> Result<u64, Error>;
}

pub trait OptionCommon {
    async fn insert(&mut self, option: OptionInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Opt>, Error>;
    async fn exists(&mut self, id: i32) -> Result<bool, Error>;
    /// Ordered by id.
    async fn query(&mut self, query: &OptionQuery) -> Result<Vec<Opt>, Error>;
    async fn update(&mut self, id: i32, option: OptionUpdate) -> Result<u64, Error>;
    async fn delete(&mut self, id: i32) -> Result<u64, Error>;
    async fn is_belongs_to_question(&mut self, question_id: i32, option_id: i32) -> Result<bool, Error>;
}

pub trait AnswerCommon {
    async fn insert(&mut self, answer: AnswerInsert) -> Result<i32, Error>;
    async fn find(&mut self, user_id: &str, question_id: i32, image_name: &str) -> Result<Option<UserAnswer>, Error>;
    async fn update_option(&mut self, id: i32, option_id: i32, image_path: &str) -> Result<(), Error>;
    /// Distinct questions of the category the user has answered for the image.
    async fn count_answered_questions(&mut self, user_id: &str, category_id: i32, image_name: &str) -> Result<i64, Error>;
    async fn mark_image_answered(&mut self, user_id: &str, category_id: i32, image_name: &str) -> Result<(), Error>;
    async fn query(&mut self, query: &AnswerQuery) -> Result<Vec<UserAnswer>, Error>;
    /// Category ⋈ UserAnswer ⋈ ImageUpload ⋈ Question ⋈ QuestionOption for the given config links.
    async fn report_rows(&mut self, config_link_ids: &[String]) -> Result<Vec<AnswerReportRow>, Error>;
    async fn activity(&mut self, config_link_id: &str) -> Result<Vec<AnswerActivity>, Error>;
}

pub trait ImageCommon {
    async fn insert(&mut self, image: ImageInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<ImageUpload>, Error>;
    /// Ordered by image name.
    async fn query_by_config_link(&mut self, config_link_id: &str, active_only: bool) -> Result<Vec<ImageUpload>, Error>;
    async fn delete(&mut self, id: i32) -> Result<u64, Error>;
}

pub trait UserCommon {
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<User>, Error>;
    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error>;
    async fn list(&mut self) -> Result<Vec<User>, Error>;
    async fn set_admin(&mut self, id: i32, is_admin: bool) -> Result<u64, Error>;
    async fn touch_login(&mut self, id: i32, at: NaiveDateTime) -> Result<(), Error>;
}

pub trait RoleCommon {
    /// `None` when the user has no row in the side table.
    async fn get_role(&mut self, kind: RoleKind, user_id: i32) -> Result<Option<bool>, Error>;
    async fn insert_role(&mut self, kind: RoleKind, user_id: i32, trusted: bool) -> Result<(), Error>;
    async fn set_role(&mut self, kind: RoleKind, user_id: i32, trusted: bool) -> Result<u64, Error>;
}

pub trait TokenCommon {
    async fn insert(&mut self, token: TokenInsert) -> Result<i32, Error>;
    async fn get_by_token(&mut self, token: &str) -> Result<Option<VerificationToken>, Error>;
    async fn delete(&mut self, id: i32) -> Result<u64, Error>;
}

pub trait WebConnectionCommon {
    async fn insert(&mut self, connection: WebConnectionInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<WebConnection>, Error>;
    /// Newest first.
    async fn list(&mut self) -> Result<Vec<WebConnection>, Error>;
    async fn update(&mut self, id: i32, connection: WebConnectionUpdate) -> Result<u64, Error>;
    async fn delete(&mut self, id: i32) -> Result<u64, Error>;
}

pub trait Store: CategoryCommon + QuestionCommon + OptionCommon + AnswerCommon + ImageCommon + UserCommon + RoleCommon + TokenCommon + WebConnectionCommon {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}
