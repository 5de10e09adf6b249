//! Request checks that run before any tenant lookup or handler call.

use chrono::Utc;

use crate::error::{Result, SubjectAreaError};
use crate::model::{FindRequest, Line, LineKind, Node, NodeKind, Status};

pub fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(SubjectAreaError::invalid_parameter(
            "userId",
            "a user id must be supplied",
        ));
    }
    Ok(())
}

pub fn validate_guid(parameter: &str, guid: Option<&str>) -> Result<()> {
    match guid {
        Some(guid) if !guid.trim().is_empty() => Ok(()),
        _ => Err(SubjectAreaError::invalid_parameter(
            parameter,
            "a guid must be supplied",
        )),
    }
}

/// Returns the name when it is present and not blank.
pub fn validate_name<'a>(parameter: &str, name: Option<&'a str>) -> Result<&'a str> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(SubjectAreaError::invalid_parameter(
            parameter,
            "a name must be supplied",
        )),
    }
}

pub fn validate_node_kind(accepted: NodeKind, node: &Node) -> Result<()> {
    if node.node_type != accepted {
        return Err(SubjectAreaError::invalid_parameter(
            "nodeType",
            format!("expected a {} but got a {}", accepted, node.node_type),
        ));
    }
    Ok(())
}

pub fn validate_line_kind(accepted: LineKind, line: &Line) -> Result<()> {
    if line.line_type != accepted {
        return Err(SubjectAreaError::invalid_parameter(
            "lineType",
            format!("expected a {} but got a {}", accepted, line.line_type),
        ));
    }
    validate_maintainable(accepted)
}

/// Anchors are created and removed with the term or category they anchor.
pub fn validate_maintainable(kind: LineKind) -> Result<()> {
    if kind.is_anchor() {
        return Err(SubjectAreaError::invalid_parameter(
            "lineType",
            format!("{} relationships are maintained through the anchored node", kind),
        ));
    }
    Ok(())
}

/// A payload may not move an instance into `DELETED`; only delete does that.
pub fn validate_status_for_write(status: Option<Status>) -> Result<()> {
    match status {
        Some(Status::Deleted) => Err(SubjectAreaError::StatusNotSupported {
            status: Status::Deleted,
            message: "use delete to remove an instance".to_string(),
        }),
        _ => Ok(()),
    }
}

/// Checks a find request and returns it with its page size bounded by
/// `max_page_size`. An absent or zero page size asks for a full page.
pub fn validate_find_request(request: &FindRequest, max_page_size: usize) -> Result<FindRequest> {
    if request.starting_from < 0 {
        return Err(SubjectAreaError::invalid_parameter(
            "startingFrom",
            "must not be negative",
        ));
    }
    let requested = request.page_size.unwrap_or(0);
    if requested < 0 {
        return Err(SubjectAreaError::invalid_parameter(
            "pageSize",
            "must not be negative",
        ));
    }
    if let Some(as_of_time) = request.as_of_time {
        if as_of_time > Utc::now() {
            return Err(SubjectAreaError::invalid_parameter(
                "asOfTime",
                "must not be in the future",
            ));
        }
    }
    let has_property = request
        .sequencing_property
        .as_deref()
        .is_some_and(|property| !property.trim().is_empty());
    if request.sequencing_order.needs_property() && !has_property {
        return Err(SubjectAreaError::invalid_parameter(
            "sequencingProperty",
            format!(
                "a property is required to order by {:?}",
                request.sequencing_order
            ),
        ));
    }

    let max = i32::try_from(max_page_size).unwrap_or(i32::MAX);
    let page_size = if requested == 0 || requested > max {
        max
    } else {
        requested
    };
    Ok(FindRequest {
        page_size: Some(page_size),
        ..request.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SequencingOrder;
    use chrono::Duration;

    #[test]
    fn test_blank_user_id_is_rejected() {
        let err = validate_user_id("  ").unwrap_err();
        assert_eq!(err.parameter(), Some("userId"));
        assert!(validate_user_id("erinoverview").is_ok());
    }

    #[test]
    fn test_guid_and_name() {
        assert_eq!(validate_guid("guid", None).unwrap_err().parameter(), Some("guid"));
        assert!(validate_guid("guid", Some("")).is_err());
        assert_eq!(validate_name("name", Some("finance")).unwrap(), "finance");
        assert!(validate_name("name", Some(" ")).is_err());
    }

    #[test]
    fn test_anchor_lines_are_not_maintainable() {
        let line = Line::between(LineKind::TermAnchor, "g", "t");
        assert!(validate_line_kind(LineKind::TermAnchor, &line).is_err());
        let line = Line::between(LineKind::Synonym, "a", "b");
        assert!(validate_line_kind(LineKind::Synonym, &line).is_ok());
        assert!(validate_line_kind(LineKind::Antonym, &line).is_err());
    }

    #[test]
    fn test_deleted_status_cannot_be_written() {
        let err = validate_status_for_write(Some(Status::Deleted)).unwrap_err();
        assert!(matches!(err, SubjectAreaError::StatusNotSupported { .. }));
        assert!(validate_status_for_write(Some(Status::Draft)).is_ok());
        assert!(validate_status_for_write(None).is_ok());
    }

    #[test]
    fn test_page_size_is_bounded() {
        let bounded = validate_find_request(&FindRequest::default(), 50).unwrap();
        assert_eq!(bounded.page_size, Some(50));

        let request = FindRequest::default().with_page(0, 500);
        assert_eq!(validate_find_request(&request, 50).unwrap().page_size, Some(50));

        let request = FindRequest::default().with_page(10, 5);
        let bounded = validate_find_request(&request, 50).unwrap();
        assert_eq!(bounded.page_size, Some(5));
        assert_eq!(bounded.starting_from, 10);
    }

    #[test]
    fn test_invalid_find_requests() {
        let negative = FindRequest::default().with_page(-1, 10);
        assert_eq!(
            validate_find_request(&negative, 50).unwrap_err().parameter(),
            Some("startingFrom")
        );

        let negative = FindRequest::default().with_page(0, -3);
        assert_eq!(
            validate_find_request(&negative, 50).unwrap_err().parameter(),
            Some("pageSize")
        );

        let future = FindRequest {
            as_of_time: Some(Utc::now() + Duration::hours(1)),
            ..FindRequest::default()
        };
        assert_eq!(
            validate_find_request(&future, 50).unwrap_err().parameter(),
            Some("asOfTime")
        );

        let unordered = FindRequest {
            sequencing_order: SequencingOrder::PropertyAscending,
            ..FindRequest::default()
        };
        assert_eq!(
            validate_find_request(&unordered, 50).unwrap_err().parameter(),
            Some("sequencingProperty")
        );
    }
}
