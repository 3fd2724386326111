use reqlog::http_url::{
    canonicalize, percent_decode, query_string_to_names_and_values, Canonicalize,
    HttpUrlBuilder,
};

#[test]
fn test_build_url_with_query_parameters() {
    let mut builder = HttpUrlBuilder::new();
    builder
        .scheme("https")
        .unwrap()
        .host("api.example.com")
        .unwrap()
        .add_path_segment("v1")
        .add_path_segment("search")
        .add_query_parameter("a b", Some("x&y"))
        .add_query_parameter("lang", Some("zh-中文"))
        .add_query_parameter("debug", None);

    let url = builder.build().unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.example.com/v1/search?a+b=x%26y&lang=zh-%E4%B8%AD%E6%96%87&debug"
    );
    assert_eq!(builder.query_parameter("lang").as_deref(), Some("zh-中文"));
}

#[test]
fn test_parse_and_rewrite_existing_url() {
    let mut builder =
        HttpUrlBuilder::parse("http://example.com:8080/items/?page=1&sort=asc&page=2#top").unwrap();

    assert_eq!(builder.query_parameter_values("page"), vec![Some("1".to_string()), Some("2".to_string())]);

    builder
        .remove_all_query_parameters("page")
        .add_path_segment("42")
        .set_query_parameter("sort", Some("desc"));

    assert_eq!(
        builder.build().unwrap().as_str(),
        "http://example.com:8080/items/42?sort=desc#top"
    );
}

#[test]
fn test_decoded_values_match_form_decoding() {
    let mut builder = HttpUrlBuilder::new();
    builder
        .scheme("http")
        .unwrap()
        .host("localhost")
        .unwrap()
        .add_query_parameter("q", Some("rust & go = fun+games 100%"))
        .add_query_parameter("emoji", Some("😀"));

    let encoded = builder.encoded_query().unwrap();
    let decoded: Vec<(String, String)> = serde_urlencoded::from_str(&encoded).unwrap();
    assert_eq!(
        decoded,
        vec![
            ("q".to_string(), "rust & go = fun+games 100%".to_string()),
            ("emoji".to_string(), "😀".to_string()),
        ]
    );
}

#[test]
fn test_query_string_example() {
    let list = query_string_to_names_and_values("subject=math&easy&problem=5-2=3");
    let expected: Vec<Option<String>> = [
        Some("subject"),
        Some("math"),
        Some("easy"),
        None,
        Some("problem"),
        Some("5-2=3"),
    ]
    .iter()
    .map(|item| item.map(str::to_string))
    .collect();
    assert_eq!(list, expected);
}

#[test]
fn test_canonical_form_is_stable_under_strict_reencoding() {
    let strict = Canonicalize::QUERY_COMPONENT.already_encoded().strict();
    for raw in ["a b", "x&y", "100%", "%zz", "été", "tab\there", "1+1=2"] {
        let canonical = canonicalize(raw, &Canonicalize::QUERY_COMPONENT).into_owned();
        assert_eq!(canonicalize(&canonical, &strict), canonical);
        assert_eq!(percent_decode(&canonical, true), raw);
    }
}
