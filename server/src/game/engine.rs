//! One game session: board, seats, turn and lifecycle.

use chrono::{DateTime, Utc};
use ttt_shared::{
    Board, Mark, Outcome, ParticipantId, PlayerPublic, SessionId, SessionSnapshot,
    SessionStatus, BOARD_CELLS,
};

use crate::error::GameError;

/// Seats in a session; the first joiner plays X, the second O.
const SEAT_MARKS: [Mark; 2] = [Mark::X, Mark::O];

#[derive(Clone, Debug)]
pub struct Session {
    id: SessionId,
    board: Board,
    players: Vec<PlayerPublic>,
    turn: Mark,
    status: SessionStatus,
    outcome: Option<Outcome>,
    created_at: DateTime<Utc>,
    concluded_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Fresh session with an empty board and no players.
    pub fn create(id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            board: [None; BOARD_CELLS],
            players: Vec::with_capacity(SEAT_MARKS.len()),
            turn: Mark::X,
            status: SessionStatus::AwaitingSecondPlayer,
            outcome: None,
            created_at: now,
            concluded_at: None,
        }
    }

    /// Seat a participant with the next unassigned mark.
    ///
    /// Seating the second player starts the game.
    pub fn join(
        &mut self,
        participant: ParticipantId,
        display_name: impl Into<String>,
    ) -> Result<Mark, GameError> {
        if self.players.len() >= SEAT_MARKS.len() {
            return Err(GameError::SessionFull);
        }
        if self.players.iter().any(|p| p.id == participant) {
            return Err(GameError::AlreadyJoined);
        }

        let mark = SEAT_MARKS[self.players.len()];
        self.players.push(PlayerPublic {
            id: participant,
            display_name: display_name.into(),
            mark,
        });
        if self.players.len() == SEAT_MARKS.len() {
            self.status = SessionStatus::InProgress;
        }
        Ok(mark)
    }

    /// Place `participant`'s mark at `position`.
    ///
    /// Every check runs before the board is touched, so a rejected move
    /// leaves the session unchanged. Returns the outcome when this move
    /// concluded the game.
    pub fn apply_move(
        &mut self,
        participant: &ParticipantId,
        position: usize,
        now: DateTime<Utc>,
    ) -> Result<Option<Outcome>, GameError> {
        if position >= BOARD_CELLS {
            return Err(GameError::InvalidPosition(position));
        }
        if self.status != SessionStatus::InProgress {
            return Err(GameError::NotPlaying);
        }
        if self.board[position].is_some() {
            return Err(GameError::CellOccupied(position));
        }
        let mark = self
            .players
            .iter()
            .find(|p| &p.id == participant)
            .map(|p| p.mark)
            .ok_or(GameError::NotAPlayer)?;
        if mark != self.turn {
            return Err(GameError::NotYourTurn);
        }

        self.board[position] = Some(mark);

        match super::lines::evaluate(&self.board, mark) {
            Some(outcome) => {
                self.status = SessionStatus::Concluded;
                self.outcome = Some(outcome);
                self.concluded_at = Some(now);
                Ok(Some(outcome))
            }
            None => {
                self.turn = mark.other();
                Ok(None)
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            board: self.board,
            current_mark: self.turn,
            players: self.players.clone(),
            status: self.status,
            outcome: self.outcome,
            created_at: self.created_at,
            concluded_at: self.concluded_at,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[PlayerPublic] {
        &self.players
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn concluded_at(&self) -> Option<DateTime<Utc>> {
        self.concluded_at
    }

    pub fn has_player(&self, participant: &ParticipantId) -> bool {
        self.players.iter().any(|p| &p.id == participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn p(id: &str) -> ParticipantId {
        ParticipantId::from(id)
    }

    fn started() -> Session {
        let mut s = Session::create(SessionId::from("g1"), ts(0));
        s.join(p("p1"), "Alice").unwrap();
        s.join(p("p2"), "Bob").unwrap();
        s
    }

    /// Play alternating moves starting with p1, asserting each is accepted.
    fn play(s: &mut Session, cells: &[usize]) -> Option<Outcome> {
        let mut last = None;
        for (i, &cell) in cells.iter().enumerate() {
            let who = if i % 2 == 0 { p("p1") } else { p("p2") };
            last = s.apply_move(&who, cell, ts(10 + i as i64)).unwrap();
        }
        last
    }

    #[test]
    fn create_is_empty_and_waiting() {
        let s = Session::create(SessionId::from("g1"), ts(5));
        assert_eq!(s.status(), SessionStatus::AwaitingSecondPlayer);
        assert_eq!(s.turn(), Mark::X);
        assert!(s.players().is_empty());
        assert!(s.board().iter().all(Option::is_none));
        assert_eq!(s.outcome(), None);
        assert_eq!(s.created_at(), ts(5));
        assert_eq!(s.concluded_at(), None);
    }

    #[test]
    fn join_assigns_marks_in_order_and_starts_game() {
        let mut s = Session::create(SessionId::from("g1"), ts(0));
        assert_eq!(s.join(p("p1"), "Alice"), Ok(Mark::X));
        assert_eq!(s.status(), SessionStatus::AwaitingSecondPlayer);
        assert_eq!(s.join(p("p2"), "Bob"), Ok(Mark::O));
        assert_eq!(s.status(), SessionStatus::InProgress);
        assert_eq!(s.players()[0].id, p("p1"));
        assert_eq!(s.players()[1].mark, Mark::O);
    }

    #[test]
    fn third_join_is_rejected_without_change() {
        let mut s = started();
        let before = s.snapshot();
        assert_eq!(s.join(p("p3"), "Carol"), Err(GameError::SessionFull));
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn same_participant_cannot_take_both_seats() {
        let mut s = Session::create(SessionId::from("g1"), ts(0));
        s.join(p("p1"), "Alice").unwrap();
        assert_eq!(s.join(p("p1"), "Alice again"), Err(GameError::AlreadyJoined));
        assert_eq!(s.players().len(), 1);
        assert_eq!(s.status(), SessionStatus::AwaitingSecondPlayer);
    }

    #[test]
    fn move_before_second_player_is_not_playing() {
        let mut s = Session::create(SessionId::from("g1"), ts(0));
        s.join(p("p1"), "Alice").unwrap();
        assert_eq!(s.apply_move(&p("p1"), 0, ts(1)), Err(GameError::NotPlaying));
        assert!(s.board().iter().all(Option::is_none));
    }

    #[test]
    fn out_of_range_position_is_rejected() {
        let mut s = started();
        assert_eq!(
            s.apply_move(&p("p1"), 9, ts(1)),
            Err(GameError::InvalidPosition(9))
        );
        assert_eq!(s.turn(), Mark::X);
    }

    #[test]
    fn stranger_cannot_move() {
        let mut s = started();
        assert_eq!(s.apply_move(&p("p9"), 0, ts(1)), Err(GameError::NotAPlayer));
        assert!(s.board().iter().all(Option::is_none));
    }

    #[test]
    fn wrong_turn_leaves_turn_untouched() {
        let mut s = started();
        assert_eq!(s.apply_move(&p("p2"), 0, ts(1)), Err(GameError::NotYourTurn));
        assert_eq!(s.turn(), Mark::X);
        assert_eq!(s.board()[0], None);
    }

    #[test]
    fn turn_alternates_after_each_accepted_move() {
        let mut s = started();
        let mut expected = Mark::X;
        for (i, cell) in [0, 4, 8, 2].into_iter().enumerate() {
            assert_eq!(s.turn(), expected);
            let who = if i % 2 == 0 { p("p1") } else { p("p2") };
            assert_eq!(s.apply_move(&who, cell, ts(1)), Ok(None));
            expected = expected.other();
        }
        assert_eq!(s.turn(), expected);
    }

    #[test]
    fn occupied_cell_is_never_overwritten() {
        let mut s = started();
        play(&mut s, &[0]);
        assert_eq!(
            s.apply_move(&p("p2"), 0, ts(2)),
            Err(GameError::CellOccupied(0))
        );
        assert_eq!(s.board()[0], Some(Mark::X));
        assert_eq!(s.turn(), Mark::O);
    }

    #[test]
    fn scenario_x_wins_through_the_middle_column() {
        let mut s = started();
        assert_eq!(s.apply_move(&p("p1"), 0, ts(1)), Ok(None));
        assert_eq!(s.board()[0], Some(Mark::X));
        assert_eq!(s.turn(), Mark::O);

        assert_eq!(
            s.apply_move(&p("p2"), 0, ts(2)),
            Err(GameError::CellOccupied(0))
        );
        assert_eq!(s.apply_move(&p("p2"), 4, ts(3)), Ok(None));
        assert_eq!(s.board()[4], Some(Mark::O));
        assert_eq!(s.turn(), Mark::X);

        assert_eq!(s.apply_move(&p("p1"), 1, ts(4)), Ok(None));
        assert_eq!(s.apply_move(&p("p2"), 8, ts(5)), Ok(None));
        assert_eq!(
            s.apply_move(&p("p1"), 2, ts(6)),
            Ok(Some(Outcome::Winner(Mark::X)))
        );
        assert_eq!(s.status(), SessionStatus::Concluded);
        assert_eq!(s.outcome(), Some(Outcome::Winner(Mark::X)));
        assert_eq!(s.concluded_at(), Some(ts(6)));
    }

    #[test]
    fn win_is_independent_of_fill_order() {
        // Top row for X in three different orders, O elsewhere.
        for x_cells in [[0, 1, 2], [2, 0, 1], [1, 2, 0]] {
            let mut s = started();
            let moves = [x_cells[0], 3, x_cells[1], 4, x_cells[2]];
            assert_eq!(play(&mut s, &moves), Some(Outcome::Winner(Mark::X)));
        }
    }

    #[test]
    fn o_can_win_on_a_diagonal() {
        let mut s = started();
        assert_eq!(
            play(&mut s, &[0, 2, 1, 4, 8, 6]),
            Some(Outcome::Winner(Mark::O))
        );
        assert_eq!(s.outcome(), Some(Outcome::Winner(Mark::O)));
    }

    #[test]
    fn full_board_without_line_is_draw() {
        // Ends as X O X / X O O / O X X
        let mut s = started();
        assert_eq!(
            play(&mut s, &[0, 1, 2, 4, 3, 5, 7, 6, 8]),
            Some(Outcome::Draw)
        );
        assert_eq!(s.status(), SessionStatus::Concluded);
        let b = s.board();
        let expected = [
            Mark::X,
            Mark::O,
            Mark::X,
            Mark::X,
            Mark::O,
            Mark::O,
            Mark::O,
            Mark::X,
            Mark::X,
        ];
        for (cell, mark) in b.iter().zip(expected) {
            assert_eq!(*cell, Some(mark));
        }
    }

    #[test]
    fn no_moves_after_conclusion() {
        let mut s = started();
        play(&mut s, &[0, 3, 1, 4, 2]);
        let before = s.snapshot();
        assert_eq!(s.apply_move(&p("p2"), 5, ts(99)), Err(GameError::NotPlaying));
        assert_eq!(s.snapshot(), before);
        assert_eq!(s.concluded_at(), Some(ts(14)));
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut s = started();
        play(&mut s, &[4]);
        let snap = s.snapshot();
        assert_eq!(snap.id, SessionId::from("g1"));
        assert_eq!(snap.board[4], Some(Mark::X));
        assert_eq!(snap.current_mark, Mark::O);
        assert_eq!(snap.status, SessionStatus::InProgress);
        assert_eq!(snap.outcome, None);
        assert_eq!(snap.players.len(), 2);
    }
}
