use may_minihttp::Response;

use crate::dispatcher::HandlerResponse;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// Serialize a handler response onto the wire. Everything this server sends
/// is JSON.
pub fn write_handler_response(res: &mut Response, hr: &HandlerResponse) {
    res.status_code(hr.status as usize, status_reason(hr.status));
    res.header("Content-Type: application/json");
    res.body_vec(serde_json::to_vec(&hr.body).unwrap_or_default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(201), "Created");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(503), "Service Unavailable");
    }
}
