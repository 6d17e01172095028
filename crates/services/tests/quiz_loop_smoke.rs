use std::sync::{Arc, Mutex};

use mutranier_core::time::fixed_clock;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{QuizLoopService, RoundError, RoundPhase, SessionError, TokioTicker};

#[tokio::test(start_paused = true)]
async fn quiz_loop_scores_round_and_times_active_segments() {
    let clock = fixed_clock();
    let service = QuizLoopService::from_config(clock.clone(), 10, true).unwrap();
    let ticks = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&ticks);

    let mut session = service
        .start_round_with_display(
            &mut StdRng::seed_from_u64(2024),
            TokioTicker::current().unwrap(),
            move |secs| sink.lock().unwrap().push(secs),
        )
        .unwrap();

    let mut expected_correct = 0;
    let mut number = 0;
    while !session.is_complete() {
        clock.advance_ms(2_000);

        // an unrecognized spelling is rejected without consuming the question
        let err = session.submit_answer("Cb").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Round(RoundError::InvalidNote { .. })
        ));

        let expected = session.state().current_question().unwrap().answer();
        let input = if number % 3 == 0 {
            expected.transpose(2).name().to_lowercase()
        } else {
            expected_correct += 1;
            format!("  {}  ", expected.name().to_lowercase())
        };
        let feedback = session.submit_answer(&input).unwrap();
        assert_eq!(feedback.expected, expected);
        assert_eq!(feedback.is_last, number == 9);

        clock.advance_ms(5_000);
        let phase = session.next().unwrap();
        if number == 9 {
            assert_eq!(phase, RoundPhase::Finished);
        } else {
            assert_eq!(phase, RoundPhase::Answering);
        }
        number += 1;
    }

    let summary = session.finish().unwrap();
    assert_eq!(summary.total(), 10);
    assert_eq!(summary.correct(), expected_correct);
    assert_eq!(summary.elapsed_ms(), 20_000);

    let review = session.review();
    assert_eq!(review.items.len(), 10);
    assert_eq!(review.mistakes().count(), 4);
    assert_eq!(review.elapsed, "0:20");

    let ticked = ticks.lock().unwrap().len();
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    assert_eq!(ticks.lock().unwrap().len(), ticked);
}
