//! Integration tests for match-result reconciliation: round linking,
//! ambiguity handling, upserts, and manual overrides.

use chrono::Utc;
use clanmatch_web::{
    create_or_update_match_result, delete_result_for_map, override_team_mapping, MapId, MatchId,
    PlayerSession, Round, TeamId, Tournament, TournamentError,
};

/// Tournament with two rostered teams, one match, one map ("berlin").
fn setup() -> (Tournament, MatchId, MapId, TeamId, TeamId) {
    let mut t = Tournament::new("Winter League");
    let team_a = t
        .add_team("1st Recon", vec!["alpha".into(), "bravo".into()])
        .unwrap();
    let team_b = t
        .add_team("Desert Rats", vec!["charlie".into(), "delta".into()])
        .unwrap();
    let match_id = t.add_match(team_a, team_b, Utc::now()).unwrap();
    let map_id = t.get_match_mut(match_id).unwrap().add_map("berlin");
    (t, match_id, map_id, team_a, team_b)
}

fn round(tickets1: Option<i32>, tickets2: Option<i32>, entries: &[(&str, u8)]) -> Round {
    let mut r = Round::new("gameserver-01", "berlin");
    r.team1_label = "Axis".into();
    r.team2_label = "Allies".into();
    r.tickets1 = tickets1;
    r.tickets2 = tickets2;
    r.sessions = entries
        .iter()
        .map(|(name, side)| PlayerSession::new(*name, *side))
        .collect();
    r
}

#[test]
fn clean_win_attributes_teams_and_winner() {
    let (mut t, match_id, map_id, team_a, team_b) = setup();
    let r = round(Some(100), Some(40), &[("alpha", 1), ("bravo", 1), ("charlie", 2)]);

    let (_, warning) = create_or_update_match_result(&mut t, &r, match_id, map_id).unwrap();
    assert!(warning.is_none());

    let result = t.result_for_map(map_id).unwrap();
    assert_eq!(result.team1_id, Some(team_a));
    assert_eq!(result.team2_id, Some(team_b));
    assert_eq!(result.team1_tickets, Some(100));
    assert_eq!(result.team2_tickets, Some(40));
    assert_eq!(result.winning_team_id, Some(team_a));
    assert_eq!(result.round_id, r.id);
}

#[test]
fn tied_tickets_mean_no_winner() {
    let (mut t, match_id, map_id, _, _) = setup();
    let r = round(Some(50), Some(50), &[("alpha", 1), ("charlie", 2)]);

    create_or_update_match_result(&mut t, &r, match_id, map_id).unwrap();
    assert_eq!(t.result_for_map(map_id).unwrap().winning_team_id, None);
}

#[test]
fn tickets_are_reordered_when_team1_played_side2() {
    let (mut t, match_id, map_id, team_a, team_b) = setup();
    // Team A's players were on round side 2, which lost 40-100.
    let r = round(Some(100), Some(40), &[("alpha", 2), ("bravo", 2), ("charlie", 1)]);

    create_or_update_match_result(&mut t, &r, match_id, map_id).unwrap();

    let result = t.result_for_map(map_id).unwrap();
    assert_eq!(result.team1_id, Some(team_a));
    assert_eq!(result.team1_tickets, Some(40));
    assert_eq!(result.team2_tickets, Some(100));
    assert_eq!(result.winning_team_id, Some(team_b));
}

#[test]
fn ambiguous_mapping_preserves_tickets_with_warning() {
    let (mut t, match_id, map_id, _, _) = setup();
    // Nobody in the round is on either roster.
    let r = round(Some(80), Some(65), &[("stranger", 1), ("randomer", 2)]);

    let (_, warning) = create_or_update_match_result(&mut t, &r, match_id, map_id).unwrap();
    assert!(warning.unwrap().contains("no matching players"));

    let result = t.result_for_map(map_id).unwrap();
    assert_eq!(result.team1_id, None);
    assert_eq!(result.team2_id, None);
    assert_eq!(result.winning_team_id, None);
    // Raw round tickets survive so totals are not lost.
    assert_eq!(result.team1_tickets, Some(80));
    assert_eq!(result.team2_tickets, Some(65));
}

#[test]
fn missing_tickets_mean_no_winner() {
    let (mut t, match_id, map_id, _, _) = setup();
    let r = round(Some(100), None, &[("alpha", 1), ("charlie", 2)]);

    create_or_update_match_result(&mut t, &r, match_id, map_id).unwrap();
    let result = t.result_for_map(map_id).unwrap();
    assert_eq!(result.winning_team_id, None);
    assert_eq!(result.team1_tickets, Some(100));
    assert_eq!(result.team2_tickets, None);
}

#[test]
fn preassigned_team_anchors_side1() {
    let (mut t, match_id, map_id, team_a, team_b) = setup();
    // Pre-assign team B to side 1; sessions would be ambiguous on their own.
    t.get_match_mut(match_id)
        .unwrap()
        .get_map_mut(map_id)
        .unwrap()
        .team_id = Some(team_b);
    let r = round(Some(70), Some(30), &[]);

    let (_, warning) = create_or_update_match_result(&mut t, &r, match_id, map_id).unwrap();
    assert!(warning.is_none());

    let result = t.result_for_map(map_id).unwrap();
    assert_eq!(result.team1_id, Some(team_a));
    assert_eq!(result.team2_id, Some(team_b));
    // Team B took side 1's 70 tickets, so team A holds side 2's 30.
    assert_eq!(result.team1_tickets, Some(30));
    assert_eq!(result.team2_tickets, Some(70));
    assert_eq!(result.winning_team_id, Some(team_b));
}

#[test]
fn relinking_upserts_in_place() {
    let (mut t, match_id, map_id, team_a, _) = setup();
    let r1 = round(Some(10), Some(90), &[("alpha", 1), ("charlie", 2)]);
    let (first_id, _) = create_or_update_match_result(&mut t, &r1, match_id, map_id).unwrap();

    // Admin relinks a corrected round for the same map.
    let r2 = round(Some(90), Some(10), &[("alpha", 1), ("charlie", 2)]);
    let (second_id, _) = create_or_update_match_result(&mut t, &r2, match_id, map_id).unwrap();

    assert_eq!(first_id, second_id);
    assert_eq!(t.match_results.len(), 1);
    let result = t.result_for_map(map_id).unwrap();
    assert_eq!(result.round_id, r2.id);
    assert_eq!(result.winning_team_id, Some(team_a));
}

#[test]
fn week_is_copied_from_match() {
    let (mut t, match_id, map_id, _, _) = setup();
    t.get_match_mut(match_id).unwrap().week = Some("Week 3".into());
    let r = round(Some(1), Some(2), &[("alpha", 1), ("charlie", 2)]);

    create_or_update_match_result(&mut t, &r, match_id, map_id).unwrap();
    assert_eq!(t.result_for_map(map_id).unwrap().week.as_deref(), Some("Week 3"));
}

#[test]
fn unknown_match_or_map_is_rejected() {
    let (mut t, match_id, _, _, _) = setup();
    let r = round(Some(1), Some(2), &[]);
    let bogus = uuid::Uuid::new_v4();
    assert_eq!(
        create_or_update_match_result(&mut t, &r, bogus, bogus),
        Err(TournamentError::MatchNotFound(bogus))
    );
    assert_eq!(
        create_or_update_match_result(&mut t, &r, match_id, bogus),
        Err(TournamentError::MapNotFound(bogus))
    );
}

#[test]
fn override_sets_teams_and_recomputes_winner_from_stored_tickets() {
    let (mut t, match_id, map_id, team_a, team_b) = setup();
    let r = round(Some(10), Some(5), &[("stranger", 1)]);
    let (result_id, warning) = create_or_update_match_result(&mut t, &r, match_id, map_id).unwrap();
    assert!(warning.is_some());

    override_team_mapping(&mut t, result_id, team_a, team_b).unwrap();
    let result = t.get_result(result_id).unwrap();
    assert_eq!(result.team1_id, Some(team_a));
    assert_eq!(result.team2_id, Some(team_b));
    assert_eq!(result.winning_team_id, Some(team_a));
}

#[test]
fn override_with_tied_tickets_yields_no_winner() {
    let (mut t, match_id, map_id, team_a, team_b) = setup();
    let r = round(Some(5), Some(5), &[("stranger", 1)]);
    let (result_id, _) = create_or_update_match_result(&mut t, &r, match_id, map_id).unwrap();

    override_team_mapping(&mut t, result_id, team_a, team_b).unwrap();
    assert_eq!(t.get_result(result_id).unwrap().winning_team_id, None);
}

#[test]
fn override_validates_team_ids() {
    let (mut t, match_id, map_id, team_a, _) = setup();
    let r = round(Some(5), Some(5), &[("stranger", 1)]);
    let (result_id, _) = create_or_update_match_result(&mut t, &r, match_id, map_id).unwrap();

    assert_eq!(
        override_team_mapping(&mut t, result_id, team_a, team_a),
        Err(TournamentError::SameTeamTwice)
    );
    let outsider = uuid::Uuid::new_v4();
    assert_eq!(
        override_team_mapping(&mut t, result_id, team_a, outsider),
        Err(TournamentError::TeamNotInTournament(outsider))
    );
}

#[test]
fn unlink_removes_the_map_result() {
    let (mut t, match_id, map_id, _, _) = setup();
    let r = round(Some(10), Some(5), &[("alpha", 1), ("charlie", 2)]);
    create_or_update_match_result(&mut t, &r, match_id, map_id).unwrap();
    assert!(t.result_for_map(map_id).is_some());

    assert!(delete_result_for_map(&mut t, map_id));
    assert!(t.result_for_map(map_id).is_none());
    // Second unlink is a no-op.
    assert!(!delete_result_for_map(&mut t, map_id));
}

#[test]
fn deleting_a_map_drops_its_result() {
    let (mut t, match_id, map_id, _, _) = setup();
    let r = round(Some(10), Some(5), &[("alpha", 1), ("charlie", 2)]);
    create_or_update_match_result(&mut t, &r, match_id, map_id).unwrap();

    t.remove_map(match_id, map_id).unwrap();
    assert!(t.result_for_map(map_id).is_none());
    assert!(t.match_results.is_empty());
}
