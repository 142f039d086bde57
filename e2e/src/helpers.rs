use log::*;

/// Pulls a single parameter out of a raw query string and percent-decodes it. Unlike a form decoder, `+` is left
/// alone, so this shows exactly what went over the wire.
pub fn raw_query_param(raw_query: &str, name: &str) -> Option<String> {
    raw_query.split('&').filter_map(|pair| pair.split_once('=')).find(|(k, _)| *k == name).and_then(|(_, v)| {
        urlencoding::decode(v)
            .map(|s| s.into_owned())
            .map_err(|e| error!("Query parameter {name} is not valid UTF-8 after decoding. {e}"))
            .ok()
    })
}

/// The names of the query parameters, in the order they were sent.
pub fn query_param_names(raw_query: &str) -> Vec<String> {
    raw_query.split('&').filter_map(|pair| pair.split_once('=')).map(|(k, _)| k.to_string()).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decodes_single_params() {
        let query = "uuid=ABC&text=Orders%20today%3A%207&icon_path=";
        assert_eq!(raw_query_param(query, "uuid").as_deref(), Some("ABC"));
        assert_eq!(raw_query_param(query, "text").as_deref(), Some("Orders today: 7"));
        assert_eq!(raw_query_param(query, "icon_path").as_deref(), Some(""));
        assert_eq!(raw_query_param(query, "missing"), None);
    }

    #[test]
    fn plus_signs_are_literal() {
        assert_eq!(raw_query_param("text=a+b", "text").as_deref(), Some("a+b"));
    }

    #[test]
    fn param_names_in_order() {
        assert_eq!(query_param_names("uuid=1&text=2&icon_path="), vec!["uuid", "text", "icon_path"]);
    }
}
