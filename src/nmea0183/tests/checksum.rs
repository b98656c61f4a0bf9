use crate::nmea0183::{checksum, checksum_trailer};
use nom::error::ErrorKind;

#[test]
fn test_checksum() {
    let cases = [
        ("GNZDA,052714.00,06,12,2024,00,00", 0x7C),
        ("GNGGA,052714.00,5624.91149,N,06153.42199,E,1,06,1.27,204.2,M,-12.4,M,,", 0x6C),
        ("GPGGA,data", 0x6A),
        ("", 0x00),
    ];

    for (input, expected) in cases {
        assert_eq!(checksum(input.as_bytes()), expected, "Failed: {input:?}");
    }
}

#[test]
fn test_single_flipped_byte_changes_checksum() {
    let payload = b"GNGSA,M,3,67,77,79,69,68,78,,,,,,,2.33,1.27,1.95,2";
    let original = checksum(payload);

    for index in 0..payload.len() {
        let mut corrupted = payload.to_vec();
        corrupted[index] ^= 0x01;
        assert_ne!(checksum(&corrupted), original, "Failed at byte {index}");
    }
}

#[test]
fn test_checksum_trailer() {
    assert_eq!(checksum_trailer("*6A").unwrap(), ("", 0x6A));
    assert_eq!(checksum_trailer("*6a").unwrap(), ("", 0x6A));
    assert_eq!(checksum_trailer("*00").unwrap(), ("", 0x00));

    let cases = [
        ("*6", ErrorKind::Eof),
        ("*6A1", ErrorKind::Count),
        ("*G1", ErrorKind::IsA),
        ("6A", ErrorKind::Char),
    ];

    for (input, kind) in cases {
        match checksum_trailer(input) {
            Err(nom::Err::Error(crate::Error::ParsingError(e))) => {
                assert_eq!(e.code, kind, "Failed: {input:?}")
            }
            other => panic!("Failed: {input:?}\n\t{other:?}"),
        }
    }
}
