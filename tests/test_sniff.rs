use gopherd::gopher::sniff::{Classifier, ContentClass, MimeSniffer, sniff};

#[test]
fn test_plain_text_is_textual() {
    assert_eq!(MimeSniffer.classify(b"Welcome to \\host\n"), ContentClass::Textual);
}

#[test]
fn test_empty_body_does_not_panic() {
    assert_eq!(sniff(b""), "text/plain; charset=utf-8");
    assert!(MimeSniffer.classify(b"").is_textual());
}

#[test]
fn test_html_and_xml_are_textual() {
    assert!(sniff(b"<!DOCTYPE html>\n<html>").starts_with("text/html"));
    assert!(sniff(b"\n  <?xml version=\"1.0\"?>").starts_with("text/xml"));
}

#[test]
fn test_binary_formats_are_binary() {
    let samples: [&[u8]; 5] = [
        b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR",
        b"\xFF\xD8\xFF\xE0\x00\x10JFIF",
        b"PK\x03\x04\x14\x00",
        b"\x1F\x8B\x08\x00",
        b"%PDF-1.4\n%",
    ];

    for sample in samples {
        assert_eq!(MimeSniffer.classify(sample), ContentClass::Binary);
    }
}

#[test]
fn test_control_bytes_make_binary() {
    assert_eq!(sniff(b"text\x01more"), "application/octet-stream");
}

#[test]
fn test_utf8_text_is_textual() {
    assert!(MimeSniffer.classify("héllo wörld\n".as_bytes()).is_textual());
}

#[test]
fn test_mp4_box_detected() {
    let mut data = Vec::new();
    data.extend_from_slice(&[0, 0, 0, 20]);
    data.extend_from_slice(b"ftypisom");
    data.extend_from_slice(&[0, 0, 2, 0]);
    data.extend_from_slice(b"mp41");

    assert_eq!(sniff(&data), "video/mp4");
}

#[test]
fn test_only_first_512_bytes_inspected() {
    let mut data = vec![b'a'; 512];
    data.push(0x00);

    assert!(MimeSniffer.classify(&data).is_textual());
}

#[test]
fn test_closure_classifier() {
    let always_binary = |_: &[u8]| ContentClass::Binary;
    assert_eq!(always_binary.classify(b"text"), ContentClass::Binary);
}
