use serde::{Deserialize, Serialize};

use super::User;

/// 세션 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    Loading,
    Authenticated,
}

/// 세션 상세 정보 (API 응답용)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    pub state: SessionState,
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl SessionDetail {
    pub fn new(state: SessionState, user: Option<User>) -> Self {
        Self {
            state,
            is_authenticated: user.is_some(),
            is_loading: state == SessionState::Loading,
            user,
        }
    }
}
