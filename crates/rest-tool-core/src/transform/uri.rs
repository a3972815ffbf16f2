/// Turn a brace-style path template into colon style: `/pets/{id}` becomes `/pets/:id`.
///
/// Every `{` becomes `:` and every `}` is dropped; braces are not escapable.
pub fn to_colon_style(uri_template: &str) -> String {
    uri_template
        .chars()
        .filter_map(|c| match c {
            '{' => Some(':'),
            '}' => None,
            c => Some(c),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_parameter() {
        assert_eq!(to_colon_style("/pets/{id}"), "/pets/:id");
    }

    #[test]
    fn test_multiple_parameters() {
        assert_eq!(
            to_colon_style("/users/{userId}/orders/{orderId}/items"),
            "/users/:userId/orders/:orderId/items"
        );
    }

    #[test]
    fn test_no_parameters() {
        assert_eq!(to_colon_style("/monitoring/isAlive"), "/monitoring/isAlive");
        assert_eq!(to_colon_style(""), "");
    }

    #[test]
    fn test_idempotent_on_colon_form() {
        for uri in ["/pets/{id}", "/a/{b}/{c}", "/plain", "/x/:y", "{}", "/{{odd}}"] {
            let once = to_colon_style(uri);
            assert_eq!(to_colon_style(&once), once, "{uri}");
        }
    }
}
