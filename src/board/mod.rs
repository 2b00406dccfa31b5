//! Board construction: geometry, deck, and per-cell slots.
//!
//! ```
//! use rust_pairs::board::{BoardLayout, SlotTable};
//! use rust_pairs::core::CellIndex;
//!
//! let layout = BoardLayout::new(3, 3, [CellIndex::new(4)]).unwrap();
//! let table = SlotTable::build(layout, 42, 8).unwrap();
//!
//! assert_eq!(table.len(), 8);
//! assert!(table.get(CellIndex::new(4)).is_none());
//! ```

pub mod layout;
pub mod deck;
pub mod slot;

pub use layout::BoardLayout;
pub use deck::{generate, Deck};
pub use slot::{CardSlot, SlotPhase, SlotTable};
