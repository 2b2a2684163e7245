// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::errors::*;
    use crate::domain::model::*;

    #[test]
    fn test_parameters_defaults() {
        let params = ProcessingParameters::default();
        assert_eq!(params.min_area_ratio, 0.01);
        assert_eq!(params.max_area_ratio, 1.0);
        assert_eq!(params.skip_frames, 10);
    }

    #[test]
    fn test_parameters_form_fields_verbatim() {
        let params = ProcessingParameters {
            min_area_ratio: 0.25,
            max_area_ratio: 1.0,
            skip_frames: 7,
        };
        let fields = params.form_fields();
        assert_eq!(fields[0], ("min_area_ratio", "0.25".to_string()));
        assert_eq!(fields[1], ("max_area_ratio", "1".to_string()));
        assert_eq!(fields[2], ("skip_frames", "7".to_string()));
    }

    #[test]
    fn test_removed_segment_parse() {
        let segment = RemovedSegment::parse("2,5.5").unwrap();
        assert_eq!(segment, RemovedSegment::new(2.0, 5.5));
        assert_eq!(segment.length(), 3.5);

        assert!(matches!(RemovedSegment::parse("2-5"), Err(DomainError::BadArgs(_))));
        assert!(RemovedSegment::parse("a,5").is_err());
        assert!(RemovedSegment::parse("2,").is_err());
    }

    #[test]
    fn test_removed_segment_deserialize() {
        let segments: Vec<RemovedSegment> =
            serde_json::from_str(r#"[{"start": 1, "end": 2.5}]"#).unwrap();
        assert_eq!(segments, vec![RemovedSegment::new(1.0, 2.5)]);
    }

    #[test]
    fn test_upload_state_helpers() {
        assert_eq!(UploadState::default(), UploadState::Idle);
        assert!(UploadState::InFlight.is_in_flight());
        assert!(!UploadState::Idle.is_in_flight());
        assert_eq!(
            UploadState::Failed("boom".to_string()).failure_message(),
            Some("boom")
        );
        assert_eq!(UploadState::Succeeded("u".to_string()).failure_message(), None);
    }

    #[test]
    fn test_upload_state_serializes_tagged() {
        let json = serde_json::to_value(UploadState::Failed("bad".to_string())).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["value"], "bad");
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!(FailurePolicy::parse("keep").unwrap(), FailurePolicy::Keep);
        assert_eq!(FailurePolicy::parse(" CLEAR ").unwrap(), FailurePolicy::Clear);
        assert!(FailurePolicy::parse("sometimes").is_err());
        assert_eq!(FailurePolicy::default(), FailurePolicy::Keep);
    }

    #[test]
    fn test_video_file_missing() {
        let err = VideoFile::from_path("/definitely/not/here.mp4").unwrap_err();
        assert!(matches!(err, DomainError::FileNotFound(_)));
    }

    #[test]
    fn test_video_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.MOV");
        std::fs::write(&path, b"not really a video").unwrap();

        let file = VideoFile::from_path(&path).unwrap();
        assert_eq!(file.file_name, "clip.MOV");
        assert_eq!(file.mime_type(), "video/quicktime");
    }

    #[test]
    fn test_playback_position_known_duration() {
        assert_eq!(PlaybackPosition::new(1.0, Some(10.0)).known_duration(), Some(10.0));
        assert_eq!(PlaybackPosition::new(1.0, Some(0.0)).known_duration(), None);
        assert_eq!(PlaybackPosition::new(1.0, None).known_duration(), None);
        assert_eq!(PlaybackPosition::new(0.0, Some(f64::NAN)).known_duration(), None);
    }
}
