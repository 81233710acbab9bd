// Chat pipeline tests against scripted in-memory collaborators

mod common;

use chrono::NaiveDate;
use common::{
    harness, sample_series, today, DataBehavior, GeocoderBehavior, PromptKind, ScriptedModel,
    StaticDataSource, StaticGeocoder,
};
use weather_companion::services::clarification::{
    CANNED_CLARIFICATION, DATA_UNAVAILABLE_MESSAGE, SERVICE_UNAVAILABLE_MESSAGE,
};
use weather_companion::services::ChatOutcome;

#[tokio::test]
async fn test_total_model_outage_still_answers() {
    let h = harness(
        ScriptedModel::failing(),
        StaticGeocoder::found("New York, United States"),
        StaticDataSource::with_series(sample_series(24.0)),
    );

    let outcome = h.chat_service.handle("weather in NYC tomorrow", today()).await;

    match outcome {
        ChatOutcome::WeatherAnswer {
            headline,
            explanation,
            source_note,
            series,
            averages,
            location,
            date_range_label,
        } => {
            assert_eq!(headline, "🌡️ Warm conditions observed for New York, United States");
            assert!(explanation.contains("24°C"));
            assert!(explanation.contains("not a live forecast"));
            assert_eq!(
                source_note,
                "Data sourced from NASA POWER meteorological database covering 2025-10-04 to 2025-10-05."
            );
            assert_eq!(series.len(), 5);
            assert_eq!(averages.temperature, 24.0);
            assert_eq!(location, "New York, United States");
            assert_eq!(date_range_label, "2025-10-04 to 2025-10-05");
        }
        other => panic!("Expected WeatherAnswer, got {:?}", other),
    }

    // Escalation failed, so the alias-mapped location was geocoded
    assert_eq!(h.geocoder.queries(), vec!["New York City, New York, USA"]);
    assert_eq!(
        h.model.calls(),
        vec![PromptKind::Resolution, PromptKind::Narrative]
    );
}

#[tokio::test]
async fn test_model_narrative_is_parsed_into_parts() {
    let model = ScriptedModel::failing().with_resolution("Paris, Île-de-France, France").with_narrative(
        "1. **☁️ Mild and breezy week**\n2. Temperatures held near 15°C with light showers.\n3. Source: NASA POWER daily data, 2025-09-26 to 2025-10-03.",
    );
    let h = harness(
        model,
        StaticGeocoder::found("Paris, Île-de-France, France"),
        StaticDataSource::with_series(sample_series(15.0)),
    );

    let outcome = h.chat_service.handle("weather in Paris", today()).await;

    let ChatOutcome::WeatherAnswer {
        headline,
        explanation,
        source_note,
        date_range_label,
        ..
    } = outcome
    else {
        panic!("Expected WeatherAnswer");
    };
    assert_eq!(headline, "☁️ Mild and breezy week");
    assert_eq!(explanation, "Temperatures held near 15°C with light showers.");
    assert_eq!(
        source_note,
        "Source: NASA POWER daily data, 2025-09-26 to 2025-10-03."
    );
    assert_eq!(date_range_label, "2025-09-26 to 2025-10-03");

    let prompts = h.model.prompts();
    let narrative_prompt = prompts.last().unwrap();
    assert!(narrative_prompt.contains("Current date: 2025-10-04"));
    assert!(narrative_prompt.contains("A user asked: \"weather in Paris\""));
}

#[tokio::test]
async fn test_malformed_narrative_uses_template() {
    let model = ScriptedModel::failing().with_narrative("Just one line about the weather");
    let h = harness(
        model,
        StaticGeocoder::found("Oslo, Norway"),
        StaticDataSource::with_series(sample_series(4.0)),
    );

    let outcome = h.chat_service.handle("weather in Oslo", today()).await;

    let ChatOutcome::WeatherAnswer { headline, .. } = outcome else {
        panic!("Expected WeatherAnswer");
    };
    assert_eq!(headline, "❄️ Cool conditions observed for Oslo, Norway");
}

#[tokio::test]
async fn test_clarification_skips_fetch() {
    let h = harness(
        ScriptedModel::failing(),
        StaticGeocoder::found("unused"),
        StaticDataSource::with_series(sample_series(20.0)),
    );

    let outcome = h
        .chat_service
        .handle("what about next Tuesday for the big event", today())
        .await;

    match outcome {
        ChatOutcome::ClarificationNeeded {
            message,
            suggested_questions,
        } => {
            assert_eq!(message, CANNED_CLARIFICATION);
            assert_eq!(suggested_questions.len(), 3);
        }
        other => panic!("Expected ClarificationNeeded, got {:?}", other),
    }

    assert_eq!(h.data_source.call_count(), 0);
    assert!(h.geocoder.queries().is_empty());
    // Nothing to escalate, so the only model call is the clarification
    assert_eq!(h.model.calls(), vec![PromptKind::Clarification]);
}

#[tokio::test]
async fn test_clarification_prefers_model_phrasing() {
    let model = ScriptedModel::failing()
        .with_clarification("  Which city and country should I look up for you?  ");
    let h = harness(
        model,
        StaticGeocoder::found("unused"),
        StaticDataSource::with_series(sample_series(20.0)),
    );

    let outcome = h.chat_service.handle("will it rain tomorrow", today()).await;

    let ChatOutcome::ClarificationNeeded { message, .. } = outcome else {
        panic!("Expected ClarificationNeeded");
    };
    assert_eq!(message, "Which city and country should I look up for you?");
}

#[tokio::test]
async fn test_escalation_result_is_geocoded() {
    let model = ScriptedModel::failing().with_resolution("Agbogba, Greater Accra, Ghana");
    let h = harness(
        model,
        StaticGeocoder::found("Agbogba, Ga East, Greater Accra Region, Ghana"),
        StaticDataSource::with_series(sample_series(28.0)),
    );

    let outcome = h.chat_service.handle("weather in Agbogba", today()).await;

    assert!(matches!(outcome, ChatOutcome::WeatherAnswer { .. }));
    assert_eq!(h.geocoder.queries(), vec!["Agbogba, Greater Accra, Ghana"]);
}

#[tokio::test]
async fn test_escalation_sentinel_keeps_local_location() {
    let model = ScriptedModel::failing().with_resolution("LOCATION_NOT_FOUND");
    let h = harness(
        model,
        StaticGeocoder::found("Agbogba, Ghana"),
        StaticDataSource::with_series(sample_series(28.0)),
    );

    let outcome = h.chat_service.handle("weather in Agbogba", today()).await;

    assert!(matches!(outcome, ChatOutcome::WeatherAnswer { .. }));
    assert_eq!(h.geocoder.queries(), vec!["Agbogba"]);
}

#[tokio::test]
async fn test_non_weather_intent_is_not_escalated() {
    let h = harness(
        ScriptedModel::failing(),
        StaticGeocoder::found("Tromsø, Troms, Norway"),
        StaticDataSource::with_series(sample_series(2.0)),
    );

    let outcome = h
        .chat_service
        .handle("aurora activity near Tromso", today())
        .await;

    assert!(matches!(outcome, ChatOutcome::WeatherAnswer { .. }));
    assert!(!h.model.calls().contains(&PromptKind::Resolution));
    assert_eq!(h.geocoder.queries(), vec!["Tromso"]);
}

#[tokio::test]
async fn test_upstream_404_is_location_not_covered() {
    let h = harness(
        ScriptedModel::failing(),
        StaticGeocoder::found("Paris, France"),
        StaticDataSource::new(DataBehavior::NotCovered),
    );

    let outcome = h.chat_service.handle("weather in Paris", today()).await;

    match outcome {
        ChatOutcome::LocationNotCovered { message, location } => {
            assert_eq!(location, "Paris, France");
            assert!(message.contains("\"Paris, France\""));
        }
        other => panic!("Expected LocationNotCovered, got {:?}", other),
    }
    assert_eq!(h.data_source.call_count(), 1);
}

#[tokio::test]
async fn test_not_covered_message_from_model() {
    let model = ScriptedModel::failing()
        .with_not_covered("NASA data for Tiny Hamlet is regional; try a larger nearby city.");
    let h = harness(
        model,
        StaticGeocoder::new(GeocoderBehavior::NotFound),
        StaticDataSource::with_series(sample_series(20.0)),
    );

    let outcome = h.chat_service.handle("weather in Tiny Hamlet", today()).await;

    match outcome {
        ChatOutcome::LocationNotCovered { message, location } => {
            assert_eq!(location, "Tiny Hamlet");
            assert_eq!(
                message,
                "NASA data for Tiny Hamlet is regional; try a larger nearby city."
            );
        }
        other => panic!("Expected LocationNotCovered, got {:?}", other),
    }
    assert_eq!(h.data_source.call_count(), 0);
}

#[tokio::test]
async fn test_upstream_5xx_is_service_unavailable() {
    let h = harness(
        ScriptedModel::failing(),
        StaticGeocoder::found("Paris, France"),
        StaticDataSource::new(DataBehavior::Unavailable(503)),
    );

    let outcome = h.chat_service.handle("weather in Paris", today()).await;

    assert_eq!(
        outcome,
        ChatOutcome::ServiceUnavailable {
            message: SERVICE_UNAVAILABLE_MESSAGE.to_string()
        }
    );
}

#[tokio::test]
async fn test_geocoder_outage_is_service_unavailable() {
    let h = harness(
        ScriptedModel::failing(),
        StaticGeocoder::new(GeocoderBehavior::Status(502)),
        StaticDataSource::with_series(sample_series(20.0)),
    );

    let outcome = h.chat_service.handle("weather in Paris", today()).await;

    assert!(matches!(outcome, ChatOutcome::ServiceUnavailable { .. }));
    assert_eq!(h.data_source.call_count(), 0);
}

#[tokio::test]
async fn test_missing_parameter_is_data_unavailable() {
    let h = harness(
        ScriptedModel::failing(),
        StaticGeocoder::found("Paris, France"),
        StaticDataSource::new(DataBehavior::MissingParameter),
    );

    let outcome = h.chat_service.handle("weather in Paris", today()).await;

    assert_eq!(
        outcome,
        ChatOutcome::ServiceUnavailable {
            message: DATA_UNAVAILABLE_MESSAGE.to_string()
        }
    );
}

#[tokio::test]
async fn test_date_context_drives_requested_range() {
    let h = harness(
        ScriptedModel::failing(),
        StaticGeocoder::found("Lagos, Nigeria"),
        StaticDataSource::with_series(sample_series(27.0)),
    );

    h.chat_service
        .handle("weather in Lagos next week", today())
        .await;
    h.chat_service.handle("weather in Lagos today", today()).await;

    let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
    assert_eq!(
        h.data_source.ranges(),
        vec![(d(10, 3), d(10, 18)), (d(10, 3), d(10, 4))]
    );
}

#[tokio::test]
async fn test_question_without_place_is_not_geocoded() {
    let h = harness(
        ScriptedModel::failing(),
        StaticGeocoder::found("unused"),
        StaticDataSource::with_series(sample_series(20.0)),
    );

    for query in [
        "What is the weather today?",
        "what's the weather like tomorrow",
        "how is the weather",
    ] {
        let outcome = h.chat_service.handle(query, today()).await;
        assert!(
            matches!(outcome, ChatOutcome::ClarificationNeeded { .. }),
            "query: {query}"
        );
    }

    assert!(h.geocoder.queries().is_empty());
    assert_eq!(h.data_source.call_count(), 0);
}

#[tokio::test]
async fn test_follow_up_sentence_is_not_part_of_place() {
    let h = harness(
        ScriptedModel::failing(),
        StaticGeocoder::found("Paris, Île-de-France, France"),
        StaticDataSource::with_series(sample_series(15.0)),
    );

    let outcome = h
        .chat_service
        .handle(
            "What is the weather in Paris. Should I bring an umbrella?",
            today(),
        )
        .await;

    assert!(matches!(outcome, ChatOutcome::WeatherAnswer { .. }));
    assert_eq!(h.geocoder.queries(), vec!["Paris, France"]);
}
