use mercato_core::MercatoError;

#[test]
fn lookup_miss_classification() {
    let miss = MercatoError::lookup_miss("SPX500 in tradingview namespace");
    assert!(miss.is_lookup_miss());

    let conn = MercatoError::connector("mercato-yfinance", "boom");
    assert!(!conn.is_lookup_miss());
}

#[test]
fn helper_constructors_carry_their_payloads() {
    match MercatoError::connector("mercato-investing", "status 503") {
        MercatoError::Connector { connector, msg } => {
            assert_eq!(connector, "mercato-investing");
            assert_eq!(msg, "status 503");
        }
        other => panic!("unexpected variant: {other:?}"),
    }

    match MercatoError::unsupported("components") {
        MercatoError::Unsupported { capability } => assert_eq!(capability, "components"),
        other => panic!("unexpected variant: {other:?}"),
    }
}
