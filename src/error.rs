pub type ScrollFxResult<T> = Result<T, ScrollFxError>;

#[derive(thiserror::Error, Debug)]
pub enum ScrollFxError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("binding error: {0}")]
    Binding(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollFxError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn binding(msg: impl Into<String>) -> Self {
        Self::Binding(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ScrollFxError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            ScrollFxError::binding("x")
                .to_string()
                .contains("binding error:")
        );
        assert!(
            ScrollFxError::evaluation("x")
                .to_string()
                .contains("evaluation error:")
        );
        assert!(
            ScrollFxError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ScrollFxError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
