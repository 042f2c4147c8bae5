/*!
Indicators of a contingency plan, read from a fixed-layout worksheet.

The pipeline is: a grid of [`Cell`]s is scanned by [`extract_indicators`] using a
[`SheetLayout`], each record is labeled by [`classify`], and the completeness of
the reporting is computed by [`summarize`]. The [`display`] module turns all of
this into the values shown in tables and charts.

```
use contingency_indicators::*;

let mut grid: Grid = vec![vec![]; 4];
let mut row = vec![Cell::Empty; 32];
row[0] = Cell::Number(7.0);
row[1] = Cell::text("2.Vigilancia");
row[25] = Cell::text("SI");
grid.push(row);

let layout = SheetLayout::contract();
let extraction = extract_indicators(&grid, &layout);
let periods = layout.period_labels();
assert_eq!(extraction.records.len(), 1);
assert_eq!(classify(&extraction.records[0], &periods), IndicatorType::Qualitative);
```
*/

mod aggregate;
mod category;
mod classify;
mod config;
pub mod display;
mod extract;
mod normalize;

pub use crate::aggregate::*;
pub use crate::category::*;
pub use crate::classify::*;
pub use crate::config::*;
pub use crate::extract::*;
pub use crate::normalize::*;
