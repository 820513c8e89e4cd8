use crate::infra::InMemorySubmissionRepository;
use clap::Args;
use screening_chat::config::AppConfig;
use screening_chat::error::AppError;
use screening_chat::workflows::screening::{
    AnswerSubmission, AnswerValue, ClinicianView, QuestionCatalog, RawAnswers, ScreeningService,
    Speaker, SubmissionReceipt, SubmissionRecord, TextGenerationGateway, TranscriptEntry,
    TurnOutcome,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed for the canned phrasing picks so the transcript repeats.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// JSON array of answers (`{"value": .., "comment": ..}`) replacing the scripted ones.
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
    /// Use the completion provider from the environment instead of canned phrasing.
    #[arg(long)]
    pub(crate) online: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON object of raw answers keyed by question id
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Print the scored draft as JSON instead of the clinician view
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        seed,
        answers,
        online,
    } = args;

    let gateway = if online {
        TextGenerationGateway::from_config(&AppConfig::load()?.generation)?
    } else {
        TextGenerationGateway::offline()
    };
    let gateway = match seed {
        Some(seed) => gateway.with_seed(seed),
        None => gateway,
    };
    let turns = match answers {
        Some(path) => load_answers(&path)?,
        None => scripted_answers(),
    };

    let catalog = Arc::new(QuestionCatalog::standard());
    let service = ScreeningService::new(
        Arc::clone(&catalog),
        Arc::new(gateway),
        Arc::new(InMemorySubmissionRepository::default()),
    );

    println!("Screening chat demo");
    println!("===================");
    let (transcript, outcome) = walk_conversation(&service, turns).await?;
    for entry in &transcript {
        print_entry(entry);
    }

    match outcome {
        Some((record, receipt)) => {
            match receipt {
                SubmissionReceipt::Stored { id } => println!("\nLagret som {id}"),
                SubmissionReceipt::NotPersisted { reason } => {
                    println!("\nIkke lagret: {reason}")
                }
            }
            println!("\n{}", ClinicianView::from_record(&record, &catalog));
        }
        None => println!(
            "\nSamtalen ble ikke fullført: {} av {} spørsmål besvart.",
            transcript
                .iter()
                .filter(|entry| entry.speaker == Speaker::User)
                .count(),
            catalog.len()
        ),
    }

    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.answers)?;
    let answers: RawAnswers = serde_json::from_str(&raw)?;

    let service = ScreeningService::new(
        Arc::new(QuestionCatalog::standard()),
        Arc::new(TextGenerationGateway::offline()),
        Arc::new(InMemorySubmissionRepository::default()),
    );
    let draft = service.preview(answers);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&draft)?);
    } else {
        let record = SubmissionRecord::from_draft(draft);
        println!("{}", ClinicianView::from_record(&record, service.catalog()));
    }
    Ok(())
}

type Completion = (Box<SubmissionRecord>, SubmissionReceipt);

/// Feed every answer through one conversation. Stops early when the
/// conversation completes or an answer is rejected.
async fn walk_conversation(
    service: &ScreeningService<InMemorySubmissionRepository>,
    turns: Vec<AnswerSubmission>,
) -> Result<(Vec<TranscriptEntry>, Option<Completion>), AppError> {
    let started = service.start_conversation().await?;
    let mut transcript = started.messages;

    for turn in turns {
        let mut user = vec![user_entry(turn.value.to_string())];
        if let Some(comment) = turn.comment.as_deref() {
            user.push(user_entry(format!("Ekstra: {comment}")));
        }

        match service.answer(&started.conversation_id, turn).await {
            Ok(TurnOutcome::Advanced { emitted, .. }) => {
                transcript.extend(user);
                transcript.extend(emitted);
            }
            Ok(TurnOutcome::Completed {
                emitted,
                record,
                receipt,
            }) => {
                transcript.extend(user);
                transcript.extend(emitted);
                return Ok((transcript, Some((record, receipt))));
            }
            Err(err) => {
                transcript.extend(user);
                transcript.push(TranscriptEntry {
                    speaker: Speaker::Bot,
                    text: format!("(avvist: {err})"),
                    source: None,
                });
                break;
            }
        }
    }

    Ok((transcript, None))
}

fn user_entry(text: String) -> TranscriptEntry {
    TranscriptEntry {
        speaker: Speaker::User,
        text,
        source: None,
    }
}

fn print_entry(entry: &TranscriptEntry) {
    match (entry.speaker, entry.source) {
        (Speaker::User, _) => println!("Du:  {}", entry.text),
        (Speaker::Bot, Some(source)) if source.is_fallback() => {
            println!("Bot: {}  [{source:?}]", entry.text)
        }
        (Speaker::Bot, _) => println!("Bot: {}", entry.text),
    }
}

fn load_answers(path: &Path) -> Result<Vec<AnswerSubmission>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_answers(&raw)
}

fn parse_answers(raw: &str) -> Result<Vec<AnswerSubmission>, AppError> {
    Ok(serde_json::from_str(raw)?)
}

fn scripted_answers() -> Vec<AnswerSubmission> {
    let mut turns = vec![
        AnswerSubmission::new("Vondt i korsryggen, særlig når jeg sitter lenge"),
        AnswerSubmission::new("6–8 uker"),
        AnswerSubmission::new(AnswerValue::Integer(7))
            .with_comment("verst om morgenen"),
    ];
    for value in [4, 3, 6, 5, 4, 6, 7, 5] {
        turns.push(AnswerSubmission::new(AnswerValue::Integer(value)));
    }
    turns
}
