use crate::error::CrumbsError;

pub fn exit_code_for_error(err: &CrumbsError) -> i32 {
    match err {
        CrumbsError::InvalidUrl(_) => 3,
        CrumbsError::Config(_) => 2,
        CrumbsError::Timeout => 28,
        CrumbsError::Status(status) => status_exit_code(*status),
        CrumbsError::PermissionDenied(_) | CrumbsError::FileNotFound(_) => 37,
        CrumbsError::Io(_) => 23,
        CrumbsError::Json(_) => 26,
        CrumbsError::NotFound(_) => 44,
        CrumbsError::NoData(inner) => exit_code_for_error(inner),
        CrumbsError::Http(err) => http_exit_code(err),
    }
}

fn http_exit_code(err: &reqwest::Error) -> i32 {
    if err.is_timeout() {
        return 28;
    }
    if err.is_connect() {
        return 7;
    }
    if err.is_decode() {
        return 26;
    }
    if err.is_request() {
        return 2;
    }
    43
}

fn status_exit_code(status: u16) -> i32 {
    match status {
        401 | 403 => 67,
        _ => 22,
    }
}

#[cfg(test)]
mod tests {
    use super::exit_code_for_error;
    use crate::error::CrumbsError;

    #[test]
    fn exit_code_maps_invalid_url() {
        let err = CrumbsError::InvalidUrl("bad".to_string());
        assert_eq!(exit_code_for_error(&err), 3);
    }

    #[test]
    fn exit_code_separates_rejected_key_from_other_statuses() {
        assert_eq!(exit_code_for_error(&CrumbsError::Status(403)), 67);
        assert_eq!(exit_code_for_error(&CrumbsError::Status(500)), 22);
    }

    #[test]
    fn exit_code_of_missing_data_follows_cause() {
        let err = CrumbsError::NoData(Box::new(CrumbsError::Timeout));
        assert_eq!(exit_code_for_error(&err), 28);
    }

    #[test]
    fn exit_code_maps_unknown_record() {
        let err = CrumbsError::NotFound("abc".to_string());
        assert_eq!(exit_code_for_error(&err), 44);
    }
}
