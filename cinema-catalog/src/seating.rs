use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatState {
    Taken,
    Available,
    Selected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: String,
    pub state: SeatState,
}

/// Grid dimensions. Rows are lettered from `A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatLayout {
    pub rows: u8,
    pub seats_per_row: u8,
}

impl Default for SeatLayout {
    fn default() -> Self {
        Self {
            rows: 8,
            seats_per_row: 10,
        }
    }
}

impl SeatLayout {
    pub const MAX_ROWS: u8 = 26;

    pub fn new(rows: u8, seats_per_row: u8) -> Result<Self, SeatError> {
        if rows == 0 || rows > Self::MAX_ROWS || seats_per_row == 0 {
            return Err(SeatError::InvalidLayout { rows, seats_per_row });
        }
        Ok(Self { rows, seats_per_row })
    }

    pub fn row_letter(row: u8) -> char {
        (b'A' + row) as char
    }

    pub fn capacity(&self) -> usize {
        self.rows as usize * self.seats_per_row as usize
    }
}

/// Pre-seeded taken seats of the default auditorium.
pub const DEFAULT_TAKEN_SEATS: [&str; 14] = [
    "A4", "A5", "B3", "B6", "C4", "C5", "D7", "D8", "E2", "F5", "F6", "G3", "G4", "G8",
];

/// Seat states of one auditorium for the lifetime of one seat page.
///
/// Nothing here is persisted: building a new map always starts from the
/// seeded taken list with no selection.
#[derive(Debug, Clone)]
pub struct SeatMap {
    layout: SeatLayout,
    rows: Vec<Vec<Seat>>,
    selection: Vec<String>,
}

impl SeatMap {
    /// Build the grid row-major. Taken ids outside the grid are ignored.
    pub fn new<S: AsRef<str>>(layout: SeatLayout, taken: &[S]) -> Self {
        let rows = (0..layout.rows)
            .map(|row| {
                let letter = SeatLayout::row_letter(row);
                (1..=layout.seats_per_row)
                    .map(|column| {
                        let id = format!("{}{}", letter, column);
                        let state = if taken.iter().any(|t| t.as_ref() == id) {
                            SeatState::Taken
                        } else {
                            SeatState::Available
                        };
                        Seat { id, state }
                    })
                    .collect()
            })
            .collect();

        Self {
            layout,
            rows,
            selection: Vec::new(),
        }
    }

    pub fn layout(&self) -> SeatLayout {
        self.layout
    }

    pub fn rows(&self) -> impl Iterator<Item = (char, &[Seat])> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, seats)| (SeatLayout::row_letter(i as u8), seats.as_slice()))
    }

    pub fn seat_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn state(&self, seat_id: &str) -> Option<SeatState> {
        self.find(seat_id).map(|seat| seat.state)
    }

    /// Flip a seat between available and selected.
    pub fn toggle(&mut self, seat_id: &str) -> Result<SeatState, SeatError> {
        let seat = self
            .find_mut(seat_id)
            .ok_or_else(|| SeatError::UnknownSeat(seat_id.to_string()))?;

        let new_state = match seat.state {
            SeatState::Taken => return Err(SeatError::Taken(seat_id.to_string())),
            SeatState::Available => SeatState::Selected,
            SeatState::Selected => SeatState::Available,
        };
        seat.state = new_state;
        let id = seat.id.clone();

        match new_state {
            SeatState::Selected => self.selection.push(id),
            _ => self.selection.retain(|s| *s != id),
        }

        Ok(new_state)
    }

    /// Selected ids in the order they were picked.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Selected ids in string order (`A10` sorts before `A2`).
    pub fn sorted_selection(&self) -> Vec<String> {
        let mut seats = self.selection.clone();
        seats.sort();
        seats
    }

    pub fn selection_string(&self) -> String {
        self.sorted_selection().join(",")
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    fn find(&self, seat_id: &str) -> Option<&Seat> {
        self.rows.iter().flatten().find(|seat| seat.id == seat_id)
    }

    fn find_mut(&mut self, seat_id: &str) -> Option<&mut Seat> {
        self.rows.iter_mut().flatten().find(|seat| seat.id == seat_id)
    }
}

impl Default for SeatMap {
    fn default() -> Self {
        Self::new(SeatLayout::default(), &DEFAULT_TAKEN_SEATS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatError {
    #[error("Seat {0} is already taken")]
    Taken(String),

    #[error("Unknown seat: {0}")]
    UnknownSeat(String),

    #[error("Invalid seat layout: {rows} rows x {seats_per_row} seats")]
    InvalidLayout { rows: u8, seats_per_row: u8 },
}
