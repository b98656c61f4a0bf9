use crate::{
    MessageType, NavigationEngine, diagnostics::NullSink, tests::support::framed, wire,
};

const FIXTURES: [&str; 12] = [
    "GNRMC,052712.00,A,5624.91014,N,06153.41794,E,0.302,,061224,,,A,V",
    "GNRMC,052712.00,V,,,,,,,061224,3.5,W,N,V",
    "GNGGA,052714.00,5624.91149,N,06153.42199,E,1,06,1.27,204.2,M,-12.4,M,2.5,0042",
    "GNGSA,M,3,67,77,79,69,68,78,,,,,,,2.33,1.27,1.95,2",
    "GNZDA,052714.00,06,12,2024,-03,30",
    "GNDHV,052714.00,0.12,0.07,0.09,0.04,0.11",
    "GNGST,052714.00,12,2.5,1.5,-45.0,1.8,1.9,3.2",
    "GPTXT,01,01,02,ANTSTATUS=OK,ANTPOWER=ON",
    "GNGLL,5624.91149,N,06153.42199,E,052714.00,A,A",
    "GLGSV,2,1,05,65,20,120,30,66,10,80,25,67,45,200,38,68,5,10,,1",
    "GNVTG,45.0,T,,M,0.120,N,0.222,K,A",
    "GNVTG,359.9,T,352.1,M,1.5,N,2.8,K,D",
];

#[test]
fn test_fixtures_survive_the_wire() {
    let mut engine = NavigationEngine::builder().log_sink(NullSink).build();

    for payload in FIXTURES {
        let line = framed(payload);
        let sentence = engine.parse_line(&line).unwrap_or_else(|e| panic!("Failed: {payload:?}\n\t{e}"));

        let encoded = wire::serialize(&sentence);
        assert_eq!(encoded[0], wire::FORMAT_VERSION);
        assert_eq!(
            MessageType::from_tag(encoded[1]),
            Some(sentence.message_type()),
            "Failed: {payload:?}"
        );
        assert_eq!(
            usize::from(u16::from_le_bytes([encoded[2], encoded[3]])),
            encoded.len() - wire::HEADER_LEN
        );
        assert_eq!(wire::deserialize(&encoded), Ok(sentence), "Failed: {payload:?}");
    }
}

#[test]
fn test_records_carry_the_same_payload() {
    let mut engine = NavigationEngine::builder().log_sink(NullSink).build();

    for payload in FIXTURES {
        let line = framed(payload);
        let record = engine.process_line(&line);
        let sentence = engine.parse_line(&line).unwrap();

        assert!(record.is_ok(), "Failed: {payload:?}");
        assert_eq!(record.payload(), wire::serialize(&sentence).as_slice());
        assert_eq!(record.decode(), Ok(sentence));
    }
}
