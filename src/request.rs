use serde::Deserialize;

/// `?userId=` on owner-scoped reads. Absent means the caller.
#[derive(Debug, Deserialize)]
pub struct OwnerParam {
    #[serde(rename = "userId")]
    pub user_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct TokenParam {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailParam {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadParam {
    #[serde(rename = "groupId")]
    pub group_id: Option<String>,
}
