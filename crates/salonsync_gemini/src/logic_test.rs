#[cfg(test)]
mod tests {
    use crate::audio::{
        decode_output, encode_input, f32_from_le_bytes, f32_to_pcm16, pcm16_to_f32,
        PlaybackScheduler, INPUT_MIME_TYPE, INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE,
    };
    use crate::session::LiveConfig;
    use crate::protocol::{ClientMessage, FunctionCall, LiveEvent, ServerMessage};
    use crate::text::{analysis_prompt, hungarian_datetime, reminder_prompt, schedule_entries};
    use crate::tools::{build_setup, dispatch, system_instruction, BOOKING_CONFIRMED};
    use crate::wake_word::{contains_wake_word, decide};
    use chrono::{DateTime, TimeZone, Utc};
    use chrono_tz::Tz;
    use proptest::prelude::*;
    use salonsync_common::models::{
        AppSettings, Appointment, Language, Service, VOICE_BOOKING_NOTE, VOICE_CLIENT_ID,
    };
    use salonsync_common::services::AppointmentStore;
    use salonsync_common::MemoryStore;
    use salonsync_schedule::time::DEFAULT_TIME_ZONE;
    use salonsync_schedule::{ScheduleState, SettingsHandle};
    use serde_json::{json, Value};
    use std::sync::Arc;

    const TZ: Tz = DEFAULT_TIME_ZONE;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        TZ.with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn appointment(id: &str, start: DateTime<Utc>, service_id: Option<&str>) -> Appointment {
        Appointment {
            id: id.to_string(),
            client_id: "temp".to_string(),
            client_name: None,
            service_id: service_id.map(str::to_string),
            start_time: start,
            notes: None,
        }
    }

    fn schedule_with(appointments: Vec<Appointment>) -> (ScheduleState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_data(Vec::new(), appointments));
        let state = ScheduleState::new(
            SettingsHandle::new(AppSettings::default()),
            store.clone(),
            TZ,
        );
        (state, store)
    }

    fn call(name: &str, args: Value) -> FunctionCall {
        FunctionCall {
            id: "call-1".to_string(),
            name: name.to_string(),
            args,
        }
    }

    #[test]
    fn test_pcm_conversion_clamps() {
        let bytes = f32_to_pcm16(&[0.0, 0.5, -1.0, 1.0, 2.5, -3.0]);
        let values: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|p| i16::from_le_bytes([p[0], p[1]]))
            .collect();
        assert_eq!(values, vec![0, 16384, -32768, 32767, 32767, -32768]);
        assert_eq!(INPUT_MIME_TYPE, format!("audio/pcm;rate={}", INPUT_SAMPLE_RATE));
    }

    #[test]
    fn test_output_decoding() {
        let pcm: Vec<u8> = [16384i16, -32768]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .chain(std::iter::once(7u8))
            .collect();
        assert_eq!(pcm16_to_f32(&pcm), vec![0.5, -1.0]);
        assert!(decode_output("not base64!").is_err());
    }

    #[test]
    fn test_browser_frames_must_hold_whole_samples() {
        let bytes: Vec<u8> = [0.25f32, -0.5].iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(f32_from_le_bytes(&bytes).unwrap(), vec![0.25, -0.5]);
        assert!(f32_from_le_bytes(&bytes[..5]).is_err());
    }

    #[test]
    fn test_playback_scheduler_queues_back_to_back() {
        let mut scheduler = PlaybackScheduler::new();
        let rate = OUTPUT_SAMPLE_RATE as usize;

        let first = scheduler.schedule(1.0, rate / 2);
        assert_eq!(first.start, 1.0);
        assert_eq!(first.duration, 0.5);

        // Arrives while the first chunk still plays
        let second = scheduler.schedule(1.2, rate);
        assert_eq!(second.start, 1.5);
        assert_eq!(scheduler.next_start(), 2.5);

        // Arrives after a gap
        let third = scheduler.schedule(4.0, rate);
        assert_eq!(third.start, 4.0);

        scheduler.reset();
        assert_eq!(scheduler.schedule(0.1, rate).start, 0.1);
    }

    proptest! {
        #[test]
        fn prop_decoded_audio_stays_close(samples in proptest::collection::vec(-1.0f32..1.0, 0..256)) {
            let decoded = decode_output(&encode_input(&samples)).unwrap();
            prop_assert_eq!(decoded.len(), samples.len());
            for (a, b) in samples.iter().zip(decoded.iter()) {
                prop_assert!((a - b).abs() <= 1.0 / 32768.0 + f32::EPSILON);
            }
        }

        #[test]
        fn prop_scheduled_chunks_never_overlap(
            chunks in proptest::collection::vec((0.0f64..10.0, 1usize..48_000), 1..20)
        ) {
            let mut scheduler = PlaybackScheduler::new();
            let mut clock = 0.0f64;
            let mut previous_end = 0.0f64;
            for (advance, samples) in chunks {
                clock += advance;
                let chunk = scheduler.schedule(clock, samples);
                prop_assert!(chunk.start >= clock);
                prop_assert!(chunk.start >= previous_end);
                previous_end = chunk.start + chunk.duration;
            }
        }
    }

    #[test]
    fn test_setup_frame_shape() {
        let setup = build_setup("gemini-2.5-flash-native-audio-preview-09-2025", Language::Ro);
        let frame = serde_json::to_value(ClientMessage::Setup(setup)).unwrap();
        assert_eq!(
            frame["setup"]["model"],
            json!("models/gemini-2.5-flash-native-audio-preview-09-2025")
        );
        assert_eq!(frame["setup"]["generationConfig"]["responseModalities"], json!(["AUDIO"]));
        let instruction = frame["setup"]["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap();
        assert!(instruction.contains("Speak briefly and elegantly in Romanian."));
        assert!(instruction.ends_with("If booking, ALWAYS check availability first."));
        let names: Vec<&str> = frame["setup"]["tools"][0]["functionDeclarations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["check_availability", "book_appointment"]);
    }

    #[test]
    fn test_system_instruction_names_language() {
        assert!(system_instruction(Language::Hu).contains("in Hungarian."));
        assert!(system_instruction(Language::En).starts_with("You are 'Sync'"));
    }

    #[test]
    fn test_server_message_events() {
        let message: ServerMessage = serde_json::from_value(json!({
            "serverContent": {
                "modelTurn": { "parts": [
                    { "inlineData": { "mimeType": "audio/pcm;rate=24000", "data": "AAA=" } },
                    { "text": "thinking" },
                    { "inlineData": { "mimeType": "audio/pcm;rate=24000", "data": "BBB=" } }
                ] },
                "turnComplete": true
            }
        }))
        .unwrap();
        assert_eq!(
            message.into_events(),
            vec![
                LiveEvent::Audio("AAA=".to_string()),
                LiveEvent::Audio("BBB=".to_string()),
                LiveEvent::TurnComplete
            ]
        );

        let message: ServerMessage = serde_json::from_value(json!({
            "toolCall": { "functionCalls": [
                { "id": "f1", "name": "check_availability", "args": { "date": "2025-05-15T10:00" } }
            ] }
        }))
        .unwrap();
        match &message.into_events()[..] {
            [LiveEvent::ToolCall(calls)] => assert_eq!(calls[0].id, "f1"),
            other => panic!("unexpected events: {:?}", other),
        }

        let message: ServerMessage =
            serde_json::from_value(json!({ "setupComplete": {} })).unwrap();
        assert_eq!(message.into_events(), vec![LiveEvent::SetupComplete]);
    }

    #[tokio::test]
    async fn test_check_availability_tool() {
        let (state, _store) = schedule_with(vec![appointment("a1", local(2025, 5, 15, 10, 0), None)]);

        let busy = dispatch(&state, &call("check_availability", json!({ "date": "2025-05-15T10:15" }))).await;
        assert_eq!(busy.result, r#"{"available":false}"#);
        assert_eq!(busy.id, "call-1");

        let free = dispatch(
            &state,
            &call("check_availability", json!({ "date": "2025-05-15T08:30:00Z" })),
        )
        .await;
        assert_eq!(free.result, r#"{"available":true}"#);

        let response = free.into_response();
        assert_eq!(response.response, json!({ "result": "{\"available\":true}" }));
    }

    #[tokio::test]
    async fn test_book_appointment_tool_creates_voice_booking() {
        let (state, store) = schedule_with(Vec::new());
        let outcome = dispatch(
            &state,
            &call("book_appointment", json!({ "date": "2025-05-15 14:00", "name": " Kata " })),
        )
        .await;
        assert_eq!(outcome.result, BOOKING_CONFIRMED);

        let stored = store.appointments().snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].client_id, VOICE_CLIENT_ID);
        assert_eq!(stored[0].client_name.as_deref(), Some("Kata"));
        assert_eq!(stored[0].notes.as_deref(), Some(VOICE_BOOKING_NOTE));
        assert_eq!(stored[0].start_time, local(2025, 5, 15, 14, 0));

        // The next check sees the booking just made
        let check = dispatch(&state, &call("check_availability", json!({ "date": "2025-05-15T14:10" }))).await;
        assert_eq!(check.result, r#"{"available":false}"#);
    }

    #[tokio::test]
    async fn test_bad_tool_calls() {
        let (state, store) = schedule_with(Vec::new());

        let unknown = dispatch(&state, &call("cancel_appointment", json!({}))).await;
        assert_eq!(unknown.result, "Done");

        let missing = dispatch(&state, &call("book_appointment", json!({ "date": "2025-05-15T10:00" }))).await;
        assert!(missing.result.starts_with("Error"));

        let garbage = dispatch(&state, &call("book_appointment", json!({ "date": "soon", "name": "Kata" }))).await;
        assert!(garbage.result.starts_with("Error"));
        assert!(store.list_appointments().await.unwrap().is_empty());
    }

    #[test]
    fn test_wake_word() {
        assert!(contains_wake_word("Hey SYNC, foglalj időpontot"));
        assert!(!contains_wake_word("szia"));

        let mut settings = AppSettings::default();
        assert!(decide(&settings, "sync").activate);
        settings.wake_word_enabled = false;
        assert!(!decide(&settings, "sync").activate);
    }

    #[test]
    fn test_hungarian_date_label() {
        assert_eq!(hungarian_datetime(local(2025, 5, 15, 9, 5), TZ), "május 15. 09:05");
        assert_eq!(
            hungarian_datetime(Utc.with_ymd_and_hms(2025, 12, 31, 23, 30, 0).unwrap(), TZ),
            "január 1. 00:30"
        );
    }

    #[test]
    fn test_prompts() {
        let prompt = reminder_prompt("Anna", "május 15. 10:00", "Festés");
        assert!(prompt.contains("Vendég neve: Anna\nIdőpont: május 15. 10:00\nSzolgáltatás: Festés\n\nAz üzenet"));
        assert!(prompt.ends_with("Ne használj idézőjeleket az outputban."));

        let prompt = analysis_prompt("[]");
        assert!(prompt.contains("Mai beosztás:\n[]\n\nFókuszálj"));
        assert!(prompt.ends_with("Formázd Markdown listaként."));
    }

    #[test]
    fn test_schedule_entries() {
        let services = vec![Service {
            id: "w-cut".to_string(),
            name: "Női hajvágás".to_string(),
            duration: 60,
            price: 8000,
            color: String::new(),
        }];
        let entries = schedule_entries(
            &[
                appointment("a", local(2025, 5, 15, 9, 0), Some("w-cut")),
                appointment("b", local(2025, 5, 15, 11, 30), Some("gone")),
            ],
            &services,
            TZ,
        );
        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(
            json,
            json!([
                { "start": "09:00", "service": "Női hajvágás", "duration": 60 },
                { "start": "11:30", "service": "Ismeretlen", "duration": 0 }
            ])
        );
    }

    fn live_config(url: &str, api_key: &str) -> LiveConfig {
        LiveConfig {
            url: url.to_string(),
            api_key: api_key.to_string(),
            model: "live-model".to_string(),
        }
    }

    #[test]
    fn test_live_endpoint_without_path() {
        let endpoint = live_config("ws://127.0.0.1:9001", "abc").endpoint().unwrap();
        assert_eq!(endpoint.path(), "/");
        assert_eq!(endpoint.as_str(), "ws://127.0.0.1:9001/?key=abc");
    }

    #[test]
    fn test_live_endpoint_keeps_path_and_query() {
        let endpoint = live_config("wss://live.example.com/ws/Bidi?alt=json", "a+b&c")
            .endpoint()
            .unwrap();
        assert_eq!(endpoint.path(), "/ws/Bidi");
        let pairs: Vec<(String, String)> = endpoint
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("alt".to_string(), "json".to_string()),
                ("key".to_string(), "a+b&c".to_string()),
            ]
        );
    }

    #[test]
    fn test_live_endpoint_rejects_garbage() {
        assert!(live_config("not a url", "abc").endpoint().is_err());
    }
}
