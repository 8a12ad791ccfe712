//! Interactive terminal session.
//!
//! The engine's events are rendered into a transcript that is flushed to
//! the output after every command.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;

use drill_core::{
    Advance, AnswerBundle, EngineState, SessionEngine, SessionEvent, SessionSummary,
};

pub const HELP: &str = "Type the translation and press enter. Commands: :h hint, :a answers, :s skip, :q quit";

/// Run one session, reading commands from `input` until it ends.
pub fn play<R: BufRead, W: Write>(
    engine: &mut SessionEngine,
    review: Option<&[String]>,
    input: R,
    out: &mut W,
) -> anyhow::Result<Option<SessionSummary>> {
    let transcript = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&transcript);
    let listener = engine.on_any(move |_, event| {
        tracing::debug!(event = %event.kind(), "session event");
        sink.borrow_mut().push(describe(event));
    });

    let result = drive(engine, review, input, out, &transcript);
    engine.off(listener);
    result
}

fn drive<R: BufRead, W: Write>(
    engine: &mut SessionEngine,
    review: Option<&[String]>,
    input: R,
    out: &mut W,
    transcript: &RefCell<Vec<String>>,
) -> anyhow::Result<Option<SessionSummary>> {
    writeln!(out, "{HELP}")?;
    engine.start_session(review)?;
    flush(out, transcript)?;

    let mut summary = None;
    for line in input.lines() {
        let line = line?;
        match line.trim() {
            "" => continue,
            ":q" | ":quit" => summary = engine.end_session(),
            ":h" | ":hint" => {
                if engine.get_hint().is_none() {
                    writeln!(out, "No more hints.")?;
                }
            }
            ":a" | ":answers" => {
                if let Some(bundle) = engine.get_answers() {
                    writeln!(out, "{}", render_answers(&bundle))?;
                }
            }
            ":s" | ":skip" => summary = finished(engine.next_word()),
            answer => {
                engine.check_answer(answer, None);
                summary = finished(engine.next_word());
            }
        }
        flush(out, transcript)?;

        if engine.state() == EngineState::Idle {
            break;
        }
    }

    // Input ran out mid-session
    if engine.state() == EngineState::Active {
        summary = engine.end_session();
        flush(out, transcript)?;
    }
    Ok(summary)
}

fn finished(advance: Option<Advance>) -> Option<SessionSummary> {
    match advance {
        Some(Advance::Finished(summary)) => Some(summary),
        _ => None,
    }
}

fn flush<W: Write>(out: &mut W, transcript: &RefCell<Vec<String>>) -> std::io::Result<()> {
    for line in transcript.borrow_mut().drain(..) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

/// One transcript line per event.
pub fn describe(event: &SessionEvent) -> String {
    match event {
        SessionEvent::SessionStarted {
            total_words,
            direction,
        } => format!("Session started: {total_words} words ({direction})"),
        SessionEvent::WordLoaded {
            index,
            total,
            term,
            word_type,
            ..
        } => match word_type {
            Some(word_type) => format!("[{}/{}] {} ({})", index + 1, total, term, word_type),
            None => format!("[{}/{}] {}", index + 1, total, term),
        },
        SessionEvent::HintRevealed {
            tier,
            language,
            text,
            ..
        } => format!("Hint {} ({}): {}", tier.number(), language, text),
        SessionEvent::AnswerCorrect {
            points,
            streak,
            score,
            ..
        } => format!("Correct! +{points} (streak {streak}, score {score})"),
        SessionEvent::AnswerWrong { expected, .. } => format!("Wrong. Expected: {expected}"),
        SessionEvent::SessionEnded(summary) => {
            let mut line = format!(
                "Session over: score {}, {}/{} correct ({}%), best streak {}",
                summary.score,
                summary.total_correct,
                summary.total_answered,
                summary.accuracy,
                summary.best_streak
            );
            if !summary.wrong_words.is_empty() {
                line.push_str(&format!("; review: {}", summary.wrong_words.join(",")));
            }
            line
        }
    }
}

fn render_answers(bundle: &AnswerBundle) -> String {
    let t = &bundle.translations;
    let mut parts = vec![bundle.term.clone()];
    for (code, text) in [("en", &t.en), ("sr", &t.sr), ("ru", &t.ru)] {
        if let Some(text) = text {
            parts.push(format!("{code}: {text}"));
        }
    }
    let mut rendered = parts.join(" | ");
    for example in &bundle.examples {
        rendered.push_str(&format!("\n  e.g. {example}"));
    }
    if let Some(explanation) = &bundle.explanation {
        rendered.push_str(&format!("\n  {explanation}"));
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::{DrillSettings, EngineConfig, Language, VocabularyEntry};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn house_engine() -> SessionEngine {
        let mut house = VocabularyEntry::new("house", "house", Language::En)
            .with_translation(Language::Sr, "kuća")
            .with_translation(Language::Ru, "дом");
        house.word_type = Some("noun".to_string());
        house.examples = vec!["My house is small.".to_string()];

        SessionEngine::new(EngineConfig {
            entries: vec![house],
            direction: "en-sr".parse().unwrap(),
            session_size: None,
        })
        .with_rng(StdRng::seed_from_u64(1))
        .with_settings(DrillSettings::default())
    }

    fn run(engine: &mut SessionEngine, input: &str) -> (Option<SessionSummary>, String) {
        let mut out = Vec::new();
        let summary = play(engine, None, Cursor::new(input.to_string()), &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn hint_then_correct_answer() {
        let mut engine = house_engine();
        let (summary, output) = run(&mut engine, ":h\nkuća\n");

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                HELP,
                "Session started: 1 words (en-sr)",
                "[1/1] house (noun)",
                "Hint 1 (sr): kuća",
                "Correct! +10 (streak 1, score 10)",
                "Session over: score 10, 1/1 correct (100%), best streak 1",
            ]
        );
        assert_eq!(summary.unwrap().accuracy, 100);
    }

    #[test]
    fn miss_comes_back_in_the_same_session() {
        let mut engine = house_engine();
        let (summary, output) = run(&mut engine, "kuca kuca\nкућа\n");

        assert!(output.contains("Wrong. Expected: kuća"));
        assert!(output.contains("[2/2] house (noun)"));
        let summary = summary.unwrap();
        assert_eq!(summary.total_answered, 2);
        assert_eq!(summary.total_correct, 1);
        assert_eq!(summary.accuracy, 50);
        assert_eq!(summary.wrong_words, vec!["house".to_string()]);
    }

    #[test]
    fn end_of_input_ends_session() {
        let mut engine = house_engine();
        let (summary, output) = run(&mut engine, "");

        assert!(output.ends_with("Session over: score 0, 0/0 correct (0%), best streak 0\n"));
        assert_eq!(summary.unwrap().total_answered, 0);
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn answers_and_quit() {
        let mut engine = house_engine();
        let (summary, output) = run(&mut engine, ":a\n:q\nnever read\n");

        assert!(output.contains("house | sr: kuća | ru: дом\n  e.g. My house is small."));
        assert!(summary.is_some());
    }

    #[test]
    fn listener_is_removed_afterwards() {
        let mut engine = house_engine();
        run(&mut engine, ":q\n");
        let mut out = Vec::new();
        // A fresh play call subscribes again; only its own events appear.
        play(&mut engine, None, Cursor::new(":q\n".to_string()), &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert_eq!(output.matches("Session started").count(), 1);
    }
}
