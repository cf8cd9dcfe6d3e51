use crate::error::ProbeError;

/// 單一媒體軌道的載入狀態
///
/// `Idle` 同時是初始狀態與關閉結果後的狀態。
/// 由驗證器觸發時一定經過 `Loading` 才會到終止狀態。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationStatus {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

impl ValidationStatus {
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Error(ProbeError::ValidationFailed(message.into()).to_string())
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Error(_))
    }

    /// `Idle → Loading`，其他狀態不變並回傳 false
    pub fn begin(&mut self) -> bool {
        if matches!(self, Self::Idle) {
            *self = Self::Loading;
            true
        } else {
            false
        }
    }

    /// `Loading → 終止狀態`，其他情況不變並回傳 false
    pub fn settle(&mut self, outcome: Self) -> bool {
        if self.is_loading() && outcome.is_terminal() {
            *self = outcome;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_cannot_jump_to_terminal() {
        let mut status = ValidationStatus::Idle;
        assert!(!status.settle(ValidationStatus::Success("x".into())));
        assert_eq!(status, ValidationStatus::Idle);
    }

    #[test]
    fn test_full_lifecycle() {
        let mut status = ValidationStatus::default();
        assert!(status.begin());
        assert!(status.is_loading());
        assert!(!status.begin());
        assert!(status.settle(ValidationStatus::failed("decode error")));
        assert_eq!(
            status,
            ValidationStatus::Error("Validation failed: decode error".into())
        );
        assert!(!status.settle(ValidationStatus::Success("late".into())));
    }

    #[test]
    fn test_loading_is_not_a_settle_outcome() {
        let mut status = ValidationStatus::Loading;
        assert!(!status.settle(ValidationStatus::Idle));
        assert!(status.is_loading());
    }
}
