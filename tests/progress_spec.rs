use chrono::Duration;
use speculate2::speculate;
use survey_flow::catalog::Catalog;
use survey_flow::completion::CompletionMarkers;
use survey_flow::error::SurveyError;
use survey_flow::models::*;
use survey_flow::progress::{Directive, Phase, Progression, StartOutcome};

fn mood_catalog() -> Catalog {
    Catalog::from_json(
        r#"{"surveys": [
            {
                "id": "mood",
                "title": "Mood Check",
                "instructions": "Two quick questions.",
                "questions": [
                    {"prompt": "How was your morning?", "choices": ["happy", "sad"]},
                    {"prompt": "How was your evening?", "choices": ["happy", "sad"], "allow_text": true}
                ]
            },
            {
                "id": "empty",
                "title": "Nothing to ask",
                "questions": []
            }
        ]}"#,
    )
    .expect("Failed to load catalog")
}

speculate! {
    before {
        let catalog = mood_catalog();
        let progression = Progression::new(&catalog);
        let mut state = SessionState::default();
        let mut markers = CompletionMarkers::new();
        let ttl = Duration::seconds(60);
    }

    describe "start_survey" {
        it "fails with NotFound for unknown surveys" {
            let result = progression.start_survey(&mut state, &markers, "weather");
            assert_eq!(result.unwrap_err(), SurveyError::NotFound("weather".to_string()));
            assert!(state.current_survey_id.is_none());
        }

        it "selects the survey and reports Started" {
            let outcome = progression.start_survey(&mut state, &markers, "mood").expect("start failed");
            assert!(matches!(outcome, StartOutcome::Started(survey) if survey.id == "mood"));
            assert_eq!(state.current_survey_id.as_deref(), Some("mood"));
            assert_eq!(progression.phase(&state), Phase::Started);
        }

        it "reports AlreadyCompleted while a marker is live" {
            markers.mark_complete("mood", ttl);
            let outcome = progression.start_survey(&mut state, &markers, "mood").expect("start failed");
            assert!(matches!(outcome, StartOutcome::AlreadyCompleted(_)));
        }
    }

    describe "show_question" {
        before {
            progression.start_survey(&mut state, &markers, "mood").expect("start failed");
        }

        it "redirects to the picker before an attempt is begun" {
            let err = progression.show_question(&mut state, 0).unwrap_err();
            assert_eq!(err.directive(), Some(Directive::RedirectToPicker));
        }

        it "renders the next unanswered question" {
            progression.begin_attempt(&mut state);
            let directive = progression.show_question(&mut state, 0).expect("show failed");
            match directive {
                Directive::ShowQuestion { index, question } => {
                    assert_eq!(index, 0);
                    assert_eq!(question.prompt, "How was your morning?");
                }
                other => panic!("expected a rendered question, got {:?}", other),
            }
            assert!(state.messages.is_empty());
        }

        it "never renders an already answered question" {
            progression.begin_attempt(&mut state);
            progression.submit_answer(&mut state, "happy", None).expect("submit failed");

            let directive = progression.show_question(&mut state, 0).expect("show failed");
            assert_eq!(directive, Directive::RedirectToQuestion(1));
        }

        it "corrects skip-ahead with a warning" {
            progression.begin_attempt(&mut state);
            progression.submit_answer(&mut state, "happy", None).expect("submit failed");

            let directive = progression.show_question(&mut state, 5).expect("show failed");
            assert_eq!(directive, Directive::RedirectToQuestion(1));
            assert_eq!(state.messages, vec!["Invalid question id: 5.".to_string()]);
        }

        it "redirects to completion once every question is answered" {
            progression.begin_attempt(&mut state);
            progression.submit_answer(&mut state, "happy", None).expect("submit failed");
            progression.submit_answer(&mut state, "sad", None).expect("submit failed");

            for requested in [0, 2, 9] {
                let directive = progression.show_question(&mut state, requested).expect("show failed");
                assert_eq!(directive, Directive::RedirectToCompletion);
            }
        }

        it "does not advance progress" {
            progression.begin_attempt(&mut state);
            progression.show_question(&mut state, 0).expect("show failed");
            progression.show_question(&mut state, 3).expect("show failed");
            assert_eq!(progression.phase(&state), Phase::Answering(0));
        }
    }

    describe "a survey without questions" {
        it "goes straight to completion" {
            progression.start_survey(&mut state, &markers, "empty").expect("start failed");
            progression.begin_attempt(&mut state);

            let directive = progression.show_question(&mut state, 0).expect("show failed");
            assert_eq!(directive, Directive::RedirectToCompletion);

            let summary = progression.complete(&state, &mut markers, ttl).expect("complete failed");
            assert!(summary.responses.is_empty());
        }
    }

    describe "begin_attempt" {
        it "clears partial progress" {
            progression.start_survey(&mut state, &markers, "mood").expect("start failed");
            progression.begin_attempt(&mut state);
            progression.submit_answer(&mut state, "happy", None).expect("submit failed");

            let directive = progression.begin_attempt(&mut state);
            assert_eq!(directive, Directive::RedirectToQuestion(0));
            assert_eq!(state.answered(), Some(0));
        }

        it "does not consult completion markers" {
            progression.start_survey(&mut state, &markers, "mood").expect("start failed");
            markers.mark_complete("mood", ttl);

            progression.begin_attempt(&mut state);
            let directive = progression.show_question(&mut state, 0).expect("show failed");
            assert!(matches!(directive, Directive::ShowQuestion { index: 0, .. }));
        }
    }

    describe "complete" {
        it "walks the mood scenario end to end" {
            let outcome = progression.start_survey(&mut state, &markers, "mood").expect("start failed");
            assert!(matches!(outcome, StartOutcome::Started(_)));

            assert_eq!(progression.begin_attempt(&mut state), Directive::RedirectToQuestion(0));
            assert!(matches!(
                progression.show_question(&mut state, 0).expect("show failed"),
                Directive::ShowQuestion { index: 0, .. }
            ));

            let next = progression.submit_answer(&mut state, "happy", None).expect("submit failed");
            assert_eq!(next, Directive::RedirectToQuestion(1));
            assert_eq!(progression.phase(&state), Phase::Answering(1));

            let next = progression.submit_answer(&mut state, "sad", Some("long day")).expect("submit failed");
            assert_eq!(next, Directive::RedirectToCompletion);
            assert_eq!(progression.phase(&state), Phase::Completed);

            let summary = progression.complete(&state, &mut markers, ttl).expect("complete failed");
            assert_eq!(summary.survey_id, "mood");
            let pairs: Vec<_> = summary
                .responses
                .iter()
                .map(|r| (r.question.prompt.as_str(), r.choice.as_str()))
                .collect();
            assert_eq!(
                pairs,
                vec![("How was your morning?", "happy"), ("How was your evening?", "sad")]
            );
            assert_eq!(summary.responses[1].text, "long day");
            assert!(markers.is_completed("mood"));

            let again = progression.start_survey(&mut state, &markers, "mood").expect("start failed");
            assert!(matches!(again, StartOutcome::AlreadyCompleted(_)));
        }

        it "can be revisited and refreshes the single marker" {
            progression.start_survey(&mut state, &markers, "mood").expect("start failed");
            progression.begin_attempt(&mut state);
            progression.submit_answer(&mut state, "happy", None).expect("submit failed");
            progression.submit_answer(&mut state, "happy", None).expect("submit failed");

            let first = progression.complete(&state, &mut markers, ttl).expect("complete failed");
            let second = progression.complete(&state, &mut markers, ttl).expect("complete failed");
            assert_eq!(first, second);
            assert_eq!(markers.len(), 1);
        }

        it "fails with SessionExpired without a survey" {
            let err = progression.complete(&state, &mut markers, ttl).unwrap_err();
            assert_eq!(err, SurveyError::SessionExpired);
            assert!(markers.is_empty());
        }
    }
}
