//! Integration Tests for TUI + Conductor
//!
//! These drive the embedded Conductor through `ConductorClient` exactly the
//! way the App does, and rebuild display state from the resulting messages.

use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::time::timeout;

use pitch_conductor::{
    Channel, ConductorMessage, ConductorState, ConfigOverrides, Field, PitchConfig, PitchDraft,
    PitchInput, SequenceOutcome,
};
use pitch_tui::conductor_client::ConductorClient;
use pitch_tui::display::DisplayState;
use pitch_tui::headless::run_headless;

fn instant_config() -> PitchConfig {
    let mut config = PitchConfig::default();
    ConfigOverrides::new().with_instant(true).apply(&mut config);
    config
}

fn acme() -> PitchInput {
    PitchInput::default()
        .with(Field::Company, "Acme")
        .with(Field::Problem, "slow onboarding")
        .with(Field::Solution, "a guided wizard")
        .with(Field::Ask, "$2M seed")
        .with(Field::Tone, "friendly")
}

async fn fill(client: &mut ConductorClient, input: &PitchInput) {
    for field in Field::ALL {
        client
            .edit_field(field, input.get(field).to_string())
            .await
            .unwrap();
    }
}

/// Apply everything the Conductor has sent so far
fn pump(client: &mut ConductorClient, display: &mut DisplayState) -> Vec<ConductorMessage> {
    let messages = client.recv_all();
    for msg in messages.clone() {
        display.apply_message(msg);
    }
    messages
}

/// Poll the way the frame loop does until the Conductor is idle again
async fn stream_to_idle(client: &mut ConductorClient, display: &mut DisplayState) {
    timeout(Duration::from_secs(30), async {
        while client.is_busy() {
            client.poll_streaming().await;
            pump(client, display);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        pump(client, display);
    })
    .await
    .expect("generation should finish");
}

#[tokio::test]
async fn test_connect_sends_form_snapshot() {
    let mut client = ConductorClient::new(instant_config());
    let mut display = DisplayState::new();

    client.connect().await.unwrap();
    pump(&mut client, &mut display);

    assert_eq!(display.conductor_state, ConductorState::Ready);
    let form = display.pending_form.expect("snapshot after connect");
    assert_eq!(form.tone, "confident");
    assert_eq!(form.company, "");
}

#[tokio::test]
async fn test_full_generation_flow() {
    let mut client = ConductorClient::new(instant_config());
    let mut display = DisplayState::new();
    client.connect().await.unwrap();
    fill(&mut client, &acme()).await;

    client.generate().await.unwrap();
    pump(&mut client, &mut display);
    assert!(display.is_streaming());

    stream_to_idle(&mut client, &mut display).await;

    assert_eq!(display.channels, PitchDraft::compose(&acme()));
    assert_eq!(
        display.channels.section(Channel::Headline),
        "Acme: a friendly path to solve slow onboarding"
    );
    assert_eq!(display.last_outcome, Some(SequenceOutcome::Completed));
    assert_eq!(display.conductor_state, ConductorState::Ready);
    assert!(display.errors.is_valid());
}

#[tokio::test]
async fn test_blank_form_reports_every_field() {
    let mut client = ConductorClient::new(instant_config());
    let mut display = DisplayState::new();
    client.connect().await.unwrap();

    client.generate().await.unwrap();
    pump(&mut client, &mut display);

    assert!(!client.is_busy());
    for field in [Field::Company, Field::Problem, Field::Solution, Field::Ask] {
        assert!(display.error_for(field).is_some(), "{field} should be flagged");
    }
    assert_eq!(display.error_for(Field::Tone), None);
    assert!(display.channels.is_empty());
}

#[tokio::test]
async fn test_fixing_the_form_clears_errors() {
    let mut client = ConductorClient::new(instant_config());
    let mut display = DisplayState::new();
    client.connect().await.unwrap();

    client.generate().await.unwrap();
    pump(&mut client, &mut display);
    assert!(!display.errors.is_valid());

    fill(&mut client, &acme()).await;
    client.generate().await.unwrap();
    stream_to_idle(&mut client, &mut display).await;

    assert!(display.errors.is_valid());
    assert_eq!(display.channels, PitchDraft::compose(&acme()));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_keeps_partial_output() {
    let mut client = ConductorClient::new(PitchConfig::default());
    let mut display = DisplayState::new();
    client.connect().await.unwrap();
    fill(&mut client, &acme()).await;

    client.generate().await.unwrap();
    // A few paced tokens
    for _ in 0..4 {
        tokio::time::sleep(Duration::from_millis(30)).await;
        client.poll_streaming().await;
        pump(&mut client, &mut display);
    }
    assert!(client.is_busy());

    client.cancel().await.unwrap();
    pump(&mut client, &mut display);
    let partial = display.channels.clone();

    assert!(!client.is_busy());
    assert_eq!(display.last_outcome, Some(SequenceOutcome::Cancelled));
    assert!(!partial.is_empty());
    assert_ne!(partial, PitchDraft::compose(&acme()));

    // Nothing further arrives
    tokio::time::sleep(Duration::from_secs(5)).await;
    client.poll_streaming().await;
    pump(&mut client, &mut display);
    assert_eq!(display.channels, partial);
}

#[tokio::test(start_paused = true)]
async fn test_regenerate_mid_stream_replaces_output() {
    let mut client = ConductorClient::new(PitchConfig::default());
    let mut display = DisplayState::new();
    client.connect().await.unwrap();
    fill(&mut client, &acme()).await;

    client.generate().await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    client.poll_streaming().await;
    pump(&mut client, &mut display);

    let second = acme().with(Field::Company, "Globex");
    client.edit_field(Field::Company, "Globex".to_string()).await.unwrap();
    client.generate().await.unwrap();
    stream_to_idle(&mut client, &mut display).await;

    assert_eq!(display.channels, PitchDraft::compose(&second));
    assert_eq!(display.last_outcome, Some(SequenceOutcome::Completed));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_small_channel_capacity_never_stalls_polling() {
    for capacity in [1, 2, 4] {
        let mut config = instant_config();
        config.channel_capacity = capacity;
        let mut client = ConductorClient::new(config);
        let mut display = DisplayState::new();
        client.connect().await.unwrap();

        let long = vec!["word"; 3000].join(" ");
        let input = acme()
            .with(Field::Problem, long.as_str())
            .with(Field::Solution, long.as_str());
        fill(&mut client, &input).await;
        client.generate().await.unwrap();
        pump(&mut client, &mut display);

        while client.is_busy() {
            timeout(Duration::from_secs(3), client.poll_streaming())
                .await
                .unwrap_or_else(|_| panic!("poll_streaming stalled at capacity {capacity}"));
            pump(&mut client, &mut display);
            tokio::task::yield_now().await;
        }
        pump(&mut client, &mut display);

        assert_eq!(display.channels, PitchDraft::compose(&input));
        assert_eq!(display.last_outcome, Some(SequenceOutcome::Completed));
    }
}

#[tokio::test]
async fn test_quit_reaches_display() {
    let mut client = ConductorClient::new(instant_config());
    let mut display = DisplayState::new();
    client.connect().await.unwrap();

    client.request_quit().await.unwrap();
    pump(&mut client, &mut display);

    assert!(display.quit_requested);
    assert_eq!(display.conductor_state, ConductorState::ShuttingDown);
}

#[tokio::test]
async fn test_headless_matches_interactive_output() {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let ok = run_headless(instant_config(), &acme(), &mut out, &mut err)
        .await
        .unwrap();
    assert!(ok);

    let draft = PitchDraft::compose(&acme());
    let expected = format!(
        "Headline:\n{}\n\nSubhead:\n{}\n\nBody:\n{}\n",
        draft.headline, draft.subhead, draft.body
    );
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}
