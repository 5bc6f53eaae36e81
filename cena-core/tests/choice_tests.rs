mod common;

use cena_core::decision::LastChoice;
use cena_core::event::LineStyle;
use cena_core::{OutputEvent, PlaybackMode};
use common::{config, line, shown, Harness};

const TRUTH: &str = "\
CHOICE,Tell the truth?,
Everything,I told everything.,CHOICE_ID=VERDADE;CHOICE_OPT=TOTAL;AFF_DAMIAO=2
Half,I told half.,CHOICE_ID=VERDADE;CHOICE_OPT=PARCIAL
CHOICE,,
BRANCH,,CHOICE_ID=VERDADE;CHOICE_OPT=TOTAL
NARRADOR,He smiles.,
BRANCH,,CHOICE_ID=VERDADE;CHOICE_OPT=PARCIAL
NARRADOR,He frowns.,
BRANCH_END,,
NARRADOR,Later.,
";

#[test]
fn choice_is_presented_with_labels() {
    let mut h = Harness::scene(&[("a", TRUTH)]);
    let ev = h.start();
    assert!(ev.contains(&OutputEvent::ShowChoice {
        prompt: "Tell the truth?".into(),
        options: vec!["Everything".into(), "Half".into()],
    }));
    assert_eq!(h.exe.mode(), &PlaybackMode::ChoicePending);
    assert_eq!(h.exe.pending_choice().map(|c| c.resume_at), Some(3));

    // confirm does nothing while a choice is open
    assert!(h.advance().is_empty());
    assert_eq!(h.exe.mode(), &PlaybackMode::ChoicePending);
}

#[test]
fn picking_an_option_records_the_decision() {
    let mut h = Harness::scene(&[("a", TRUTH)]);
    h.start();

    let ev = h.choose(0);
    assert!(ev.contains(&OutputEvent::AffinityDelta { delta: 2 }));
    assert!(ev.contains(&OutputEvent::DefocusAll));
    assert_eq!(line(&ev), (None, "I told everything.".into(), LineStyle::Narration));

    let decisions = h.exe.decisions();
    assert_eq!(decisions.last_choice(), Some(LastChoice { id: "VERDADE".into(), opt: "TOTAL".into() }));
    assert_eq!(decisions.affinity(), 2);
    assert!(decisions.moral_flag());
}

#[test]
fn matching_branch_plays_and_the_rest_is_skipped() {
    let mut h = Harness::scene(&[("a", TRUTH)]);
    h.start();
    h.choose(0);

    assert_eq!(shown(&h.advance()), vec!["He smiles."]);
    assert_eq!(shown(&h.advance()), vec!["Later."]);
}

#[test]
fn second_branch_is_found_by_scanning() {
    let mut h = Harness::scene(&[("a", TRUTH)]);
    h.start();
    h.choose(1);
    assert!(!h.exe.decisions().moral_flag());

    assert_eq!(shown(&h.advance()), vec!["He frowns."]);
    assert_eq!(h.exe.mode(), &PlaybackMode::Narrating);
    assert_eq!(shown(&h.advance()), vec!["Later."]);
}

#[test]
fn no_decision_skips_the_whole_branch_run() {
    let rows = "BRANCH,,CHOICE_ID=X;CHOICE_OPT=A\nNARRADOR,a,\nBRANCH_END,,\nNARRADOR,after,\n";
    let mut h = Harness::scene(&[("a", rows)]);
    assert_eq!(shown(&h.start()), vec!["after"]);
}

#[test]
fn branch_without_choice_id_never_matches() {
    let rows = "BRANCH,,CHOICE_OPT=A\nNARRADOR,hidden,\nBRANCH_END,,\nNARRADOR,after,\n";
    let mut h = Harness::scene(&[("a", rows)]);
    h.exe.decisions().set_last_choice("", "A");
    assert_eq!(shown(&h.start()), vec!["after"]);
}

#[test]
fn unterminated_branch_runs_to_end_of_script() {
    let rows = "BRANCH,,CHOICE_ID=X;CHOICE_OPT=A\nNARRADOR,hidden,\n";
    let mut h = Harness::scene(&[("a", rows), ("b", "NARRADOR,b0,\n")]);
    let ev = h.start();
    assert_eq!(shown(&ev), vec!["b0"]);
}

#[test]
fn out_of_range_selection_is_ignored() {
    let mut h = Harness::scene(&[("a", TRUTH)]);
    h.start();
    assert!(h.choose(7).is_empty());
    assert_eq!(h.exe.mode(), &PlaybackMode::ChoicePending);
    assert!(h.exe.decisions().last_choice().is_none());
}

#[test]
fn selection_outside_a_choice_is_ignored() {
    let mut h = Harness::scene(&[("a", "NARRADOR,one,\n")]);
    h.start();
    assert!(h.choose(0).is_empty());
}

#[test]
fn empty_option_text_goes_straight_on() {
    let rows = "CHOICE,Go?,\nSkip,,CHOICE_ID=GO;CHOICE_OPT=NO\nCHOICE,,\nNARRADOR,after,\n";
    let mut h = Harness::scene(&[("a", rows)]);
    h.start();
    assert_eq!(shown(&h.choose(0)), vec!["after"]);
    assert_eq!(h.exe.position().line_index, 3);
}

#[test]
fn options_beyond_the_slots_play_as_lines() {
    let rows = "CHOICE,Pick,\nA,one,CHOICE_ID=P;CHOICE_OPT=A\nB,two,CHOICE_ID=P;CHOICE_OPT=B\nC,three,CHOICE_ID=P;CHOICE_OPT=C\n";
    let mut cfg = config(&[("main", &["a"])]);
    cfg.playback.choice_slots = 2;
    let mut h = Harness::new(&[("a", rows)], cfg);

    let ev = h.start();
    assert!(ev.contains(&OutputEvent::ShowChoice { prompt: "Pick".into(), options: vec!["A".into(), "B".into()] }));

    h.choose(1);
    assert_eq!(line(&h.advance()), (Some("C".into()), "three".into(), LineStyle::Dialogue));
}

#[test]
fn option_label_falls_back_to_text() {
    let rows = "CHOICE,Pick,\n,Stay quiet,CHOICE_ID=P;CHOICE_OPT=Q\n";
    let mut h = Harness::scene(&[("a", rows)]);
    let ev = h.start();
    assert!(ev.contains(&OutputEvent::ShowChoice { prompt: "Pick".into(), options: vec!["Stay quiet".into()] }));
}

#[test]
fn answer_auto_advances_after_reveal() {
    let mut cfg = config(&[("main", &["a"])]);
    cfg.playback.reveal_cps = 10.0;
    cfg.playback.choice_auto_advance_secs = Some(1.5);
    let mut h = Harness::new(&[("a", TRUTH)], cfg);
    h.start();
    h.choose(0);

    // 18 characters: the reveal takes 1.8s, the delay starts after it
    h.tick(1.0);
    assert!(h.exe.is_revealing());
    h.tick(1.0);
    assert!(!h.exe.is_revealing());
    assert!(shown(&h.tick(1.2)).is_empty());
    assert_eq!(shown(&h.tick(0.2)), vec!["He smiles."]);
}

#[test]
fn reveal_overshoot_does_not_count_whole_frame() {
    let mut cfg = config(&[("main", &["a"])]);
    cfg.playback.reveal_cps = 10.0;
    cfg.playback.choice_auto_advance_secs = Some(1.5);
    let mut h = Harness::new(&[("a", TRUTH)], cfg);
    h.start();
    h.choose(0);

    // 1.8s of reveal plus 0.2s of delay
    let ev = h.tick(2.0);
    assert!(ev.contains(&OutputEvent::RevealFinished));
    assert!(shown(&ev).is_empty());
    assert_eq!(h.exe.position().line_index, 3);
    assert!(shown(&h.tick(1.2)).is_empty());
    assert_eq!(shown(&h.tick(0.2)), vec!["He smiles."]);
}

#[test]
fn finishing_the_reveal_by_hand_cancels_auto_advance() {
    let mut cfg = config(&[("main", &["a"])]);
    cfg.playback.reveal_cps = 10.0;
    cfg.playback.choice_auto_advance_secs = Some(1.0);
    let mut h = Harness::new(&[("a", TRUTH)], cfg);
    h.start();
    h.choose(0);

    assert_eq!(h.advance(), vec![OutputEvent::RevealFinished]);
    assert!(h.tick(5.0).is_empty());
    assert_eq!(h.exe.position().line_index, 3);
    assert_eq!(shown(&h.advance()), vec!["He smiles."]);
}

#[test]
fn manual_advance_cancels_auto_advance() {
    let mut cfg = config(&[("main", &["a"])]);
    cfg.playback.choice_auto_advance_secs = Some(1.0);
    let mut h = Harness::new(&[("a", TRUTH)], cfg);
    h.start();
    h.choose(0);
    assert_eq!(shown(&h.advance()), vec!["He smiles."]);
    assert!(shown(&h.tick(5.0)).is_empty());
    assert_eq!(h.exe.position().line_index, 5);
}

#[test]
fn non_positive_delay_disables_auto_advance() {
    let mut cfg = config(&[("main", &["a"])]);
    cfg.playback.choice_auto_advance_secs = Some(0.0);
    let mut h = Harness::new(&[("a", TRUTH)], cfg);
    h.start();
    h.choose(0);
    assert!(shown(&h.tick(10.0)).is_empty());
}

#[test]
fn last_choice_overwrites_earlier_ones() {
    let rows = "\
CHOICE,First,
Yes,yes,CHOICE_ID=A;CHOICE_OPT=Y
CHOICE,Second,
No,no,CHOICE_ID=B;CHOICE_OPT=N
CHOICE,,
BRANCH,,CHOICE_ID=A;CHOICE_OPT=Y
NARRADOR,stale,
BRANCH_END,,
NARRADOR,end,
";
    let mut h = Harness::scene(&[("a", rows)]);
    h.start();
    h.choose(0);
    let ev = h.advance();
    assert!(ev.iter().any(|e| matches!(e, OutputEvent::ShowChoice { .. })));
    h.choose(0);
    assert_eq!(shown(&h.advance()), vec!["end"]);
}

#[test]
fn saving_during_an_answer_keeps_the_resume_point() {
    let mut h = Harness::scene(&[("a", TRUTH)]);
    h.start();
    h.choose(1);
    h.exe.save_bookmark().unwrap();
    let store = h.store.borrow();
    let saved: usize = cena_core::storager::read(&*store, cena_core::storager::types::keys::BOOKMARK_LINE).unwrap();
    assert_eq!(saved, 3);
}
