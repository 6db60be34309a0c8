use rand::SeedableRng;
use rand::rngs::StdRng;

use services::AppServices;
use services::exam::{ExamSession, ExamStep, ExamTick, ExamTimer, TICK_PERIOD};
use services::flashcards::{CardFace, FlashcardDeck};
use services::quiz::{QuizPhase, QuizSession};
use services::search::{SearchOutcome, highlight};
use study_core::exam::ExamResult;
use study_core::model::{Question, WeekId};
use study_core::scoring::{OptionMark, QuestionReview};
use study_core::timer::{FinishReason, format_clock};

use crate::console::{Console, parse_choices, parse_week_switch};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

//
// ─── PROGRESS & CONTENT ────────────────────────────────────────────────────────
//

pub async fn progress(app: &AppServices, reset: bool) -> CommandResult {
    if reset {
        app.progress().reset().await?;
        app.progress().initialize().await?;
        println!("Progress cleared.");
    }
    let rows = app.progress().overview(&app.content()).await?;
    println!(
        "{:<8} {:<32} {:>11} {:>6} {:>9} {:>6}",
        "Week", "Title", "Flashcards", "%", "Attempts", "Quiz"
    );
    for row in rows {
        println!(
            "{:<8} {:<32} {:>11} {:>5}% {:>9} {:>5}%",
            row.week.label(),
            row.title,
            format!("{}/{}", row.flashcards.known, row.flashcards.total),
            row.flashcard_percentage,
            row.quiz_attempts,
            row.quiz_percentage,
        );
    }
    Ok(())
}

pub fn cheatsheets(app: &AppServices) {
    let sections = app.cheatsheets();
    if sections.is_empty() {
        println!("No cheat sheets available.");
    }
    for section in sections {
        println!("\n{}", section.heading);
        for point in &section.points {
            println!("  • {point}");
        }
    }
}

pub fn search(app: &AppServices, console: &Console, query: &str) {
    match app.search(query) {
        SearchOutcome::TooShort => println!("Enter at least 2 characters to search."),
        SearchOutcome::NoResults => println!("Nothing found."),
        SearchOutcome::Hits(hits) => {
            for hit in hits {
                println!("{}", hit.heading);
                println!("  {}", console.highlight(&highlight(&hit.text, query)));
            }
        }
    }
}

//
// ─── FLASHCARDS ────────────────────────────────────────────────────────────────
//

pub async fn flashcards(
    app: &AppServices,
    console: &mut Console,
    week: Option<WeekId>,
) -> CommandResult {
    let mut deck = app.flashcard_deck();
    let Some(first) = week.or_else(|| deck.weeks().next()) else {
        println!("No flashcards available.");
        return Ok(());
    };
    if deck.select_week(first).is_none() {
        println!("{} has no flashcards.", first.label());
        return Ok(());
    }
    println!("Enter flips, y = knew it, n = didn't, w N = switch week, r = restart, q = quit");
    show_card(&deck);

    while let Some(line) = console.read_line().await? {
        let Some(session) = deck.current_mut() else {
            break;
        };
        match line.as_str() {
            "q" => break,
            "" | "f" => {
                if let Err(err) = session.flip() {
                    println!("{err}");
                }
            }
            "y" | "n" => {
                if let Err(err) = app.flashcards().mark(session, line == "y").await {
                    println!("{err}");
                }
            }
            "r" => session.restart(),
            other => match parse_week_switch(other) {
                Some(Ok(next)) => {
                    if deck.select_week(next).is_none() {
                        println!("{} has no flashcards.", next.label());
                    }
                }
                Some(Err(err)) => println!("{err}"),
                None => println!("Unknown command: {other}"),
            },
        }
        show_card(&deck);
    }
    Ok(())
}

fn show_card(deck: &FlashcardDeck) {
    let Some(session) = deck.current() else {
        return;
    };
    if let Some(summary) = session.summary() {
        println!(
            "\n{} done: {} known, {} to repeat ({}%). r = restart, w N = switch week, q = quit",
            session.week().label(),
            summary.known,
            summary.unknown,
            summary.percentage
        );
        return;
    }
    let header = format!(
        "{} · card {}/{} · reviewed {}",
        session.week().label(),
        session.position() + 1,
        session.total(),
        session.reviewed()
    );
    match session.face() {
        Some(CardFace::Front(text)) => println!("\n{header}\n  {text}"),
        Some(CardFace::Back(text)) => println!("\n{header}\n  → {text}\n  Did you know it? (y/n)"),
        None => {}
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

pub async fn quiz(app: &AppServices, console: &mut Console, week: Option<WeekId>) -> CommandResult {
    let content = app.content();
    let first_with_questions = || {
        content
            .questions
            .keys()
            .copied()
            .find(|w| content.questions_for(*w).is_some())
    };
    let Some(week) = week.or_else(first_with_questions) else {
        println!("No quiz questions available.");
        return Ok(());
    };
    let Some(mut session) = app.start_quiz(week) else {
        println!("{} has no quiz questions.", week.label());
        return Ok(());
    };
    println!("{}: {}", week.label(), content.week_title(week));
    println!(
        "Type option numbers (e.g. 1,3) to toggle, Enter to check and continue, w N = switch week, q to quit"
    );
    show_quiz_question(&session);

    while let Some(line) = console.read_line().await? {
        if line == "q" {
            break;
        }
        if let Some(switch) = parse_week_switch(&line) {
            match switch {
                Ok(next) => match app.start_quiz(next) {
                    Some(fresh) => {
                        session = fresh;
                        println!("\n{}: {}", next.label(), content.week_title(next));
                        show_quiz_question(&session);
                    }
                    None => println!("{} has no quiz questions.", next.label()),
                },
                Err(err) => println!("{err}"),
            }
            continue;
        }
        if session.is_finished() {
            match line.as_str() {
                "v" => print_review(&session.review()),
                "r" => {
                    session.restart();
                    show_quiz_question(&session);
                }
                _ => println!("v = review answers, r = try again, w N = switch week, q = quit"),
            }
            continue;
        }
        if line.is_empty() {
            quiz_enter(app, &mut session).await?;
            continue;
        }
        let Some(question) = session.current() else {
            continue;
        };
        match parse_choices(&line, question.options.len()) {
            Ok(choices) => {
                for choice in choices {
                    session.select(choice)?;
                }
                if session.phase() == QuizPhase::Answering {
                    print_selection(session.selection().map(|s| s.as_slice()).unwrap_or_default());
                }
            }
            Err(err) => println!("{err}"),
        }
    }
    Ok(())
}

async fn quiz_enter(app: &AppServices, session: &mut QuizSession) -> CommandResult {
    match session.phase() {
        QuizPhase::Answering => match session.check() {
            Ok(check) => {
                if check.is_correct {
                    println!("Correct!");
                } else {
                    let correct: Vec<String> =
                        check.correct.iter().map(|i| (i + 1).to_string()).collect();
                    println!("Incorrect. Correct answer: {}", correct.join(", "));
                }
                if !check.explanation.is_empty() {
                    println!("Explanation: {}", check.explanation);
                }
                println!("Press Enter to continue.");
            }
            Err(err) => println!("{err}"),
        },
        QuizPhase::Reviewing => {
            if session.next()? == QuizPhase::Finished {
                let results = app.quiz().complete(session).await?;
                println!("\nQuiz results: {}%", results.percentage);
                println!("Correct answers: {} of {}", results.score, results.total);
                println!("{}", results.feedback.message());
                println!("v = review answers, r = try again, w N = switch week, q = quit");
            } else {
                show_quiz_question(session);
            }
        }
        QuizPhase::Finished => {}
    }
    Ok(())
}

fn show_quiz_question(session: &QuizSession) {
    if let Some(question) = session.current() {
        println!("\nQuestion {} of {}", session.position() + 1, session.total());
        print_question(question);
    }
}

//
// ─── EXAM ──────────────────────────────────────────────────────────────────────
//

pub async fn exam(app: &AppServices, console: &mut Console, seed: Option<u64>) -> CommandResult {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut session = app.start_exam(&mut rng)?;
    println!(
        "Exam: {} questions, {} minutes. Numbers pick options, Enter moves on, s submits, t shows time.",
        session.total(),
        session.countdown().limit() / 60
    );
    show_exam_question(&session);

    let (timer, mut ticks) = ExamTimer::spawn(TICK_PERIOD);
    let mut warned_low = false;
    let result = loop {
        tokio::select! {
            tick = ticks.recv() => {
                if tick.is_none() {
                    break None;
                }
                match session.tick() {
                    ExamTick::Running { low: true, remaining } if !warned_low => {
                        warned_low = true;
                        println!("⚠ {} left", format_clock(remaining));
                    }
                    ExamTick::Expired(result) => {
                        println!("\nTime is up!");
                        break Some(result);
                    }
                    _ => {}
                }
            }
            line = console.read_line() => {
                let Some(line) = line? else {
                    break None;
                };
                if let Some(result) = exam_input(&mut session, &line)? {
                    break Some(result);
                }
            }
        }
    };
    timer.cancel();

    if let Some(result) = result {
        print_exam_result(app, &result);
        println!("v = review answers, q = quit");
        while let Some(line) = console.read_line().await? {
            match line.as_str() {
                "v" => print_review(&session.review()),
                "q" => break,
                _ => println!("v = review answers, q = quit"),
            }
        }
    }
    Ok(())
}

fn exam_input(
    session: &mut ExamSession,
    line: &str,
) -> Result<Option<ExamResult>, Box<dyn std::error::Error>> {
    match line {
        "s" => return Ok(Some(session.submit()?)),
        "t" => println!("{} left", session.countdown().display()),
        "" => match session.advance() {
            Ok(ExamStep::Next(_)) => show_exam_question(session),
            Ok(ExamStep::Finished(result)) => return Ok(Some(result)),
            Err(err) => println!("{err}"),
        },
        other => {
            let Some(item) = session.current() else {
                return Ok(None);
            };
            match parse_choices(other, item.question.options.len()) {
                Ok(choices) => {
                    for choice in choices {
                        session.select(choice)?;
                    }
                    print_selection(session.selection().map(|s| s.as_slice()).unwrap_or_default());
                }
                Err(err) => println!("{err}"),
            }
        }
    }
    Ok(None)
}

fn show_exam_question(session: &ExamSession) {
    if let Some(item) = session.current() {
        println!(
            "\nQuestion {} of {} · {} left",
            session.position() + 1,
            session.total(),
            session.countdown().display()
        );
        print_question(&item.question);
    }
}

fn print_exam_result(app: &AppServices, result: &ExamResult) {
    let content = app.content();
    println!("\nExam result: {}% (grade {})", result.percentage, result.grade.letter());
    println!("Correct answers: {} of {}", result.correct, result.total);
    println!("Time used: {}", format_clock(result.elapsed_secs));
    if result.reason == FinishReason::TimedOut {
        println!("Submitted automatically when time ran out.");
    }
    println!("{}", result.grade.message());
    if !result.weak_weeks.is_empty() {
        println!("Topics to review:");
        for weak in &result.weak_weeks {
            println!(
                "  {}: {} ({} missed)",
                weak.week.label(),
                content.week_title(weak.week),
                weak.misses
            );
        }
    }
}

//
// ─── SHARED RENDERING ──────────────────────────────────────────────────────────
//

fn print_question(question: &Question) {
    println!("{}", question.prompt);
    if !question.is_single_answer() {
        println!("(select all that apply)");
    }
    for (idx, option) in question.options.iter().enumerate() {
        println!("  {}. {option}", idx + 1);
    }
}

fn print_selection(selected: &[usize]) {
    let picks: Vec<String> = selected.iter().map(|i| (i + 1).to_string()).collect();
    if picks.is_empty() {
        println!("Selected: none");
    } else {
        println!("Selected: {}", picks.join(", "));
    }
}

fn print_review(review: &[QuestionReview]) {
    for (idx, item) in review.iter().enumerate() {
        let verdict = if item.is_correct { "✓" } else { "✗" };
        println!("\n{verdict} {}. {}", idx + 1, item.prompt);
        for (opt_idx, (text, mark)) in item.options.iter().enumerate() {
            let marker = match mark {
                OptionMark::Correct => "✓",
                OptionMark::WrongPick => "✗",
                OptionMark::Neutral => " ",
            };
            let picked = if item.selected.contains(&opt_idx) { "*" } else { " " };
            println!("  {marker}{picked} {}. {text}", opt_idx + 1);
        }
        if !item.explanation.is_empty() {
            println!("  Explanation: {}", item.explanation);
        }
    }
}
