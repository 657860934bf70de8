#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use dha::api::openai::{classify_failure, AiClient};
    use dha::libs::config::AiConfig;
    use dha::libs::error::DhaError;
    use dha::libs::habit::Habit;
    use dha::libs::habit_log::HabitLog;
    use dha::libs::insight::HabitInsight;
    use reqwest::StatusCode;

    fn habit(id: i64, name: &str) -> Habit {
        let created = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(8, 30, 0).unwrap();
        Habit {
            id,
            name: name.to_string(),
            description: None,
            color: "#3b82f6".to_string(),
            created_at: created,
            updated_at: created,
        }
    }

    fn log(id: i64, habit_id: i64, day: u32, completed: bool) -> HabitLog {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        HabitLog {
            id,
            habit_id,
            date,
            completed,
            note: None,
            created_at: date.and_hms_opt(20, 0, 0).unwrap(),
        }
    }

    fn ai_message(err: DhaError) -> String {
        match err {
            DhaError::Ai(message) => message,
            other => panic!("expected an AI error, got {other:?}"),
        }
    }

    #[test]
    fn test_insights_summarise_each_habit() {
        let habits = vec![habit(1, "Read"), habit(2, "Meditate")];
        let logs = vec![log(1, 1, 1, true), log(2, 1, 2, true), log(3, 1, 3, false)];

        let insights = HabitInsight::collect(&habits, &logs);

        assert_eq!(insights[0].total_logs, 3);
        assert_eq!(insights[0].completed_logs, 2);
        assert_eq!(insights[0].completion_rate, "66.7%");
        assert_eq!(insights[0].description, "No description");
        assert_eq!(insights[1].total_logs, 0);
        assert_eq!(insights[1].completion_rate, "0%");

        let json = serde_json::to_value(&insights[0]).unwrap();
        assert_eq!(json["completionRate"], "66.7%");
        assert_eq!(json["createdAt"], "2024-03-01T08:30:00");
    }

    #[test]
    fn test_request_carries_model_and_context() {
        let config = AiConfig {
            api_url: "https://llm.example.test/v1/".into(),
            model: "gpt-4o-mini".into(),
            ..Default::default()
        };
        let client = AiClient::new(config, "sk-test");
        let context = HabitInsight::collect(&[habit(1, "Read")], &[]);

        assert_eq!(client.endpoint(), "https://llm.example.test/v1/chat/completions");

        let request = client.build_request("  Which habit do I skip most?  ", &context).unwrap();
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
        assert!(request.messages[1].content.contains("\"name\": \"Read\""));
        assert!(request.messages[1].content.contains("User's question: Which habit do I skip most?"));
    }

    #[test]
    fn test_blank_question_is_rejected() {
        let client = AiClient::new(AiConfig::default(), "sk-test");
        assert!(client.build_request("   ", &[]).is_err());
        assert!(client.build_request(&"?".repeat(1001), &[]).is_err());
    }

    #[test]
    fn test_failures_are_classified() {
        let unauthorized = ai_message(classify_failure(StatusCode::UNAUTHORIZED, "{}"));
        assert!(unauthorized.contains("Invalid OpenAI API key"));

        let rate_limited = ai_message(classify_failure(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"Rate limit reached","type":"requests","code":"rate_limit_exceeded"}}"#,
        ));
        assert!(rate_limited.contains("rate limit"));

        let quota = ai_message(classify_failure(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":"insufficient_quota"}}"#,
        ));
        assert!(quota.contains("quota exceeded"));

        let other = ai_message(classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "upstream down"));
        assert!(other.contains("upstream down"));
        assert!(other.contains("500"));
    }
}
