//! Media Services live outputs (`Microsoft.Media`, 2022-08-01)

crate::string_enum! {
    AsyncOperationStatus {
        Failed => "Failed",
        InProgress => "InProgress",
        Succeeded => "Succeeded",
    }
}

crate::string_enum! {
    LiveOutputResourceState {
        Creating => "Creating",
        Deleting => "Deleting",
        Running => "Running",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_state_is_kept() {
        let state: LiveOutputResourceState = serde_json::from_str("\"Stopping\"").unwrap();
        assert_eq!(state, LiveOutputResourceState::Other("Stopping".to_string()));
        assert_eq!(
            LiveOutputResourceState::possible_values(),
            &["Creating", "Deleting", "Running"]
        );
    }

    #[test]
    fn status_ignores_case() {
        assert_eq!(AsyncOperationStatus::parse("inprogress"), AsyncOperationStatus::InProgress);
        assert_eq!(AsyncOperationStatus::Succeeded.to_string(), "Succeeded");
    }
}
