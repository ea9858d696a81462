use super::*;

#[test]
fn request_serialization_shape() {
    let messages = vec![
        ChatMessage::system("You output strictly JSON."),
        ChatMessage::user("triage this complaint"),
    ];
    let request = ChatRequest {
        model: "gpt-4o-mini",
        temperature: 0.2,
        messages: &messages,
    };

    let json = serde_json::to_value(&request).expect("serialization should succeed");

    assert_eq!(json["model"], "gpt-4o-mini");
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["messages"][1]["content"], "triage this complaint");
}

#[test]
fn response_parsing_takes_first_choice() {
    let body = r#"{
        "choices": [
            {"message": {"role": "assistant", "content": "{\"summary\":\"x\"}"}},
            {"message": {"role": "assistant", "content": "ignored"}}
        ]
    }"#;

    let response: ChatResponse = serde_json::from_str(body).expect("parse should succeed");
    let content = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .expect("choice should exist");

    assert_eq!(content, "{\"summary\":\"x\"}");
}
