/// API fetch state enum
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    NotStarted,
    Loading,
    Success(T),
    Error(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&String> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_state_accessors() {
        let state: FetchState<i32> = FetchState::default();
        assert!(!state.is_loading() && !state.is_success() && !state.is_error());

        let state = FetchState::Success(7);
        assert_eq!(state.data(), Some(&7));
        assert_eq!(state.error(), None);

        let state: FetchState<i32> = FetchState::Error("boom".to_string());
        assert!(state.is_error());
        assert_eq!(state.error().map(String::as_str), Some("boom"));
    }
}
