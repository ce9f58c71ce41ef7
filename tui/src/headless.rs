//! Headless Mode
//!
//! Runs a single generation without a terminal. The Conductor is driven
//! exactly as the TUI drives it; the only difference is that the result is
//! printed instead of drawn.

use std::io::Write;

use tokio::sync::mpsc;

use pitch_conductor::{
    Channel, Conductor, ConductorMessage, Field, GenerateError, GenerationBackend, PitchConfig,
    PitchInput, SequenceOutcome, SurfaceEvent, SurfaceType,
};

/// Generate once for `input`
///
/// On success the three sections are written to `out`, one labelled block per
/// channel. Validation errors go to `err`, one per line, and `Ok(false)` is
/// returned so the caller can exit non-zero.
///
/// # Errors
///
/// Returns an error only if writing to `out` or `err` fails.
pub async fn run_headless(
    config: PitchConfig,
    input: &PitchInput,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<bool> {
    let (tx, mut rx) = mpsc::channel(config.channel_capacity);
    let mut conductor = Conductor::with_template(config, tx);

    // Drain surface messages concurrently so the Conductor never blocks on them
    let collector = tokio::spawn(async move {
        let mut tokens = 0usize;
        let mut outcome = None;
        while let Some(msg) = rx.recv().await {
            match msg {
                ConductorMessage::Token { .. } => tokens += 1,
                ConductorMessage::StreamEnd { outcome: o, .. } => outcome = Some(o),
                _ => {}
            }
        }
        (tokens, outcome)
    });

    connect(&mut conductor, input).await?;

    let result = conductor.generate().await;
    if let Err(GenerateError::Validation(errors)) = &result {
        for (_, message) in errors.iter() {
            writeln!(err, "{message}")?;
        }
        return Ok(false);
    }

    conductor.run_to_idle().await;
    let channels = conductor.channels().clone();
    // Dropping the Conductor closes the message channel
    drop(conductor);
    let (tokens, outcome) = collector.await?;
    tracing::debug!(tokens, outcome = ?outcome, "Headless generation finished");

    if outcome != Some(SequenceOutcome::Completed) {
        writeln!(err, "generation did not complete")?;
        return Ok(false);
    }

    for (i, channel) in Channel::ALL.into_iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}:", channel.label())?;
        writeln!(out, "{}", channels.section(channel))?;
    }
    out.flush()?;
    Ok(true)
}

/// Register as the headless surface and load the form values
async fn connect<B: GenerationBackend>(
    conductor: &mut Conductor<B>,
    input: &PitchInput,
) -> anyhow::Result<()> {
    conductor
        .handle_event(SurfaceEvent::Connected {
            event_id: SurfaceEvent::new_event_id(),
            surface_type: SurfaceType::Headless,
        })
        .await?;
    for field in Field::ALL {
        conductor
            .handle_event(SurfaceEvent::FieldEdited {
                field,
                value: input.get(field).to_string(),
            })
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitch_conductor::{ConfigOverrides, Pacing};
    use pretty_assertions::assert_eq;

    fn instant() -> PitchConfig {
        let mut config = PitchConfig::default();
        ConfigOverrides::new().with_instant(true).apply(&mut config);
        assert_eq!(config.pacing, Pacing::instant());
        config
    }

    #[tokio::test]
    async fn test_connect_registers_headless_surface() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut conductor = Conductor::with_template(instant(), tx);
        let input = PitchInput::default()
            .with(Field::Company, "Acme")
            .with(Field::Tone, "casual");

        connect(&mut conductor, &input).await.unwrap();

        assert_eq!(conductor.surface_type(), Some(SurfaceType::Headless));
        assert_eq!(conductor.input(), &input);
        let first = rx.try_recv().unwrap();
        assert!(matches!(first, ConductorMessage::Ack { .. }));
    }

    #[tokio::test]
    async fn test_headless_prints_sections() {
        let input = PitchInput::default()
            .with(Field::Company, "Acme")
            .with(Field::Problem, "slow onboarding")
            .with(Field::Solution, "a guided wizard")
            .with(Field::Ask, "$2M seed")
            .with(Field::Tone, "friendly");
        let mut out = Vec::new();
        let mut err = Vec::new();

        let ok = run_headless(instant(), &input, &mut out, &mut err)
            .await
            .unwrap();
        assert!(ok);
        assert!(err.is_empty());

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Headline:\nAcme: a friendly path to solve slow onboarding\n"));
        assert!(text.contains(
            "Subhead:\nwe deal with slow onboarding using a guided wizard. the ask: $2M seed.\n"
        ));
        assert!(text.contains("Body:\nat Acme, we are focused on solvign slow onboarding"));
    }

    #[test]
    fn test_headless_reports_blank_fields() {
        let input = PitchInput::default().with(Field::Company, "Acme");
        let mut out = Vec::new();
        let mut err = Vec::new();

        let ok = tokio_test::block_on(run_headless(instant(), &input, &mut out, &mut err)).unwrap();
        assert!(!ok);
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "problem is required.\nsolution is required.\nask is required.\n"
        );
    }
}
