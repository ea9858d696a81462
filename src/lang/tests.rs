use super::*;

#[test]
fn english_complaint_is_en() {
    let text = "I received a suspicious phone call claiming my internet bill \
                is overdue and demanding immediate payment by gift card.";
    assert_eq!(detect_language(text), "en");
}

#[test]
fn malay_complaint_is_ms() {
    let text = "Saya menerima panggilan daripada seseorang yang mendakwa dia \
                pegawai bank dan meminta saya memindahkan wang dengan segera.";
    assert_eq!(detect_language(text), "ms");
}

#[test]
fn empty_text_defaults_to_en() {
    assert_eq!(detect_language(""), "en");
    assert_eq!(detect_language("   \n\t"), "en");
}

#[test]
fn gibberish_never_panics() {
    let result = detect_language("0101 9911 ### $$$");
    assert!(!result.is_empty());
}
