use rstest::rstest;
use solana_actions::codec::{encode_action_url, encode_blink_url, parse_url, parse_url_str};
use solana_actions::{
    ActionRequestFields, ActionUrl, BlinkFields, CodecError, ErrorKind, ProtocolScheme,
};
use url::Url;

#[test]
fn alice_donation_link_encodes_and_parses_back() {
    let fields = ActionRequestFields::new(Url::parse("https://actions.alice.com/donate").unwrap())
        .with_label("wonderland")
        .with_message("the_builder");

    let encoded = encode_action_url(&fields, ProtocolScheme::Action).unwrap();
    assert_eq!(
        encoded.as_str(),
        "solana-action:https://actions.alice.com/donate?label=wonderland&message=the_builder"
    );
    assert_eq!(parse_url(&encoded).unwrap(), ActionUrl::Action(fields));
}

#[rstest]
#[case(ProtocolScheme::Pay)]
#[case(ProtocolScheme::Action)]
#[case(ProtocolScheme::Actions)]
fn every_registered_scheme_round_trips(#[case] scheme: ProtocolScheme) {
    let fields = ActionRequestFields::new(Url::parse("https://a.io/api/tip").unwrap());
    let encoded = encode_action_url(&fields, scheme).unwrap();
    assert_eq!(encoded.scheme(), scheme.as_str());

    let parsed = parse_url(&encoded).unwrap().into_action();
    assert_eq!(parsed.link, fields.link);
    // Absent hints come back as empty strings.
    assert_eq!(parsed.label.as_deref(), Some(""));
    assert_eq!(parsed.message.as_deref(), Some(""));
}

#[test]
fn query_carrying_link_survives_exactly() {
    let link = "https://example.com/api/action?query=param&amount=1337";
    let fields = ActionRequestFields::new(Url::parse(link).unwrap()).with_label("label");
    let encoded = encode_action_url(&fields, ProtocolScheme::Action).unwrap();
    let reparsed = parse_url_str(encoded.as_str()).unwrap().into_action();
    assert_eq!(reparsed.link.as_str(), link);
    assert_eq!(reparsed.label.as_deref(), Some("label"));
}

#[test]
fn blink_round_trip_and_nesting() {
    let inner = ActionRequestFields::new(Url::parse("https://actions.alice.com/donate").unwrap())
        .with_label("wonderland");
    let blink = BlinkFields {
        blink: Url::parse("https://dial.to/?cluster=devnet").unwrap(),
        action: inner.clone(),
    };
    let encoded = encode_blink_url(&blink, ProtocolScheme::Action).unwrap();
    let ActionUrl::Blink(decoded) = parse_url(&encoded).unwrap() else {
        panic!("expected a blink");
    };
    assert_eq!(decoded.action, inner);
    assert!(
        decoded
            .blink
            .query_pairs()
            .any(|(key, value)| key == "cluster" && value == "devnet")
    );

    // Wrapping the blink in another blink must be refused.
    let mut outer = Url::parse("https://outer.example/").unwrap();
    outer
        .query_pairs_mut()
        .append_pair("action", encoded.as_str());
    assert_eq!(parse_url(&outer), Err(CodecError::NestedBlink));
}

#[rstest]
#[case("ftp://example.com/action", ErrorKind::Protocol)]
#[case("https://blink.example/?other=1", ErrorKind::Codec)]
#[case("solana-action:https%3A%2F%2F", ErrorKind::Codec)]
#[case("solana-action:http://insecure.example/api", ErrorKind::Codec)]
fn failures_fall_into_their_categories(#[case] input: &str, #[case] kind: ErrorKind) {
    assert_eq!(parse_url_str(input).unwrap_err().kind(), kind);
}
