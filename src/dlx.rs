//! Sparse exact-cover matrix for Dancing Links.
//!
//! The matrix is a torus of circular doubly-linked lists kept in an arena.
//! Links are indices into `nodes`:
//! - node 0 is the root, linking the active column headers horizontally
//! - node `c + 1` is the header of column `c` (one column per grid cell)
//! - every following node is one (row, column) entry of a placement
//!
//! `cover` splices nodes out but leaves their own links untouched, so
//! `uncover` can put them back in reverse order.

use crate::error::PuzzleError;
use crate::placement::Placement;

/// Index of a node in the arena.
pub(crate) type NodeId = usize;

const ROOT: NodeId = 0;

/// Row id stored on header nodes.
const NO_ROW: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    up: NodeId,
    down: NodeId,
    left: NodeId,
    right: NodeId,
    /// Column index (not the header's node id).
    column: usize,
    row: usize,
}

impl Node {
    fn singleton(id: NodeId, column: usize, row: usize) -> Self {
        Self {
            up: id,
            down: id,
            left: id,
            right: id,
            column,
            row,
        }
    }
}

/// The cover structure for one solve attempt.
///
/// A search mutates the matrix in place, so every independent solve needs a
/// freshly built instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactCoverMatrix {
    nodes: Vec<Node>,
    /// Live number of row entries per column.
    sizes: Vec<usize>,
    rows: usize,
}

impl ExactCoverMatrix {
    /// Builds the matrix for `rows` over `columns` columns.
    ///
    /// Row ids are positions in `rows`. Each row's entries are linked in the
    /// order given and appended to the bottom of their columns.
    pub fn new<R: AsRef<[usize]>>(rows: &[R], columns: usize) -> Result<Self, PuzzleError> {
        let entries: usize = rows.iter().map(|r| r.as_ref().len()).sum();
        let mut nodes = Vec::with_capacity(1 + columns + entries);

        nodes.push(Node::singleton(ROOT, NO_ROW, NO_ROW));
        for column in 0..columns {
            let id = header(column);
            nodes.push(Node {
                left: id - 1,
                right: ROOT,
                ..Node::singleton(id, column, NO_ROW)
            });
            nodes[id - 1].right = id;
            nodes[ROOT].left = id;
        }

        let mut matrix = Self {
            nodes,
            sizes: vec![0; columns],
            rows: rows.len(),
        };

        for (row, cells) in rows.iter().enumerate() {
            let mut first: Option<NodeId> = None;
            for &cell in cells.as_ref() {
                if cell >= columns {
                    return Err(PuzzleError::CellOutOfRange { row, cell, columns });
                }
                let id = matrix.push_entry(row, cell);
                match first {
                    None => first = Some(id),
                    Some(first) => matrix.link_before(first, id),
                }
            }
        }

        Ok(matrix)
    }

    /// Builds the matrix with one row per placement and one column per cell.
    pub fn from_placements(placements: &[Placement], columns: usize) -> Result<Self, PuzzleError> {
        let rows: Vec<&[usize]> = placements.iter().map(|p| &p.cells[..]).collect();
        Self::new(&rows, columns)
    }

    /// Appends a node to the bottom of `column`'s vertical list.
    fn push_entry(&mut self, row: usize, column: usize) -> NodeId {
        let id = self.nodes.len();
        let head = header(column);
        let bottom = self.nodes[head].up;
        self.nodes.push(Node {
            up: bottom,
            down: head,
            ..Node::singleton(id, column, row)
        });
        self.nodes[bottom].down = id;
        self.nodes[head].up = id;
        self.sizes[column] += 1;
        id
    }

    /// Inserts `id` to the left of `first` in its row, i.e. at the row's end.
    fn link_before(&mut self, first: NodeId, id: NodeId) {
        let last = self.nodes[first].left;
        self.nodes[id].left = last;
        self.nodes[id].right = first;
        self.nodes[last].right = id;
        self.nodes[first].left = id;
    }

    /// Total number of columns, covered or not.
    pub fn columns(&self) -> usize {
        self.sizes.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// True once every column has been covered.
    pub fn is_empty(&self) -> bool {
        self.nodes[ROOT].right == ROOT
    }

    pub fn column_size(&self, column: usize) -> usize {
        self.sizes[column]
    }

    /// Columns still linked into the header list, left to right.
    pub fn active_columns(&self) -> impl Iterator<Item = usize> + '_ {
        let mut id = self.nodes[ROOT].right;
        std::iter::from_fn(move || {
            if id == ROOT {
                return None;
            }
            let column = self.nodes[id].column;
            id = self.nodes[id].right;
            Some(column)
        })
    }

    /// The leftmost active column.
    pub fn first_column(&self) -> Option<usize> {
        self.active_columns().next()
    }

    /// The active column with the fewest rows; the leftmost wins ties.
    pub fn choose_column(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for column in self.active_columns() {
            if best.map_or(true, |b| self.sizes[column] < self.sizes[b]) {
                best = Some(column);
            }
        }
        best
    }

    /// Row ids currently reachable through `column`, top to bottom.
    pub fn rows_in_column(&self, column: usize) -> Vec<usize> {
        let head = header(column);
        let mut rows = Vec::with_capacity(self.sizes[column]);
        let mut id = self.nodes[head].down;
        while id != head {
            rows.push(self.nodes[id].row);
            id = self.nodes[id].down;
        }
        rows
    }

    /// Removes `column` from the header list and every row through it from
    /// the other columns.
    pub fn cover(&mut self, column: usize) {
        let head = header(column);
        let Node { left, right, .. } = self.nodes[head];
        self.nodes[right].left = left;
        self.nodes[left].right = right;

        let mut i = self.nodes[head].down;
        while i != head {
            let mut j = self.nodes[i].right;
            while j != i {
                let Node { up, down, column: col, .. } = self.nodes[j];
                self.nodes[down].up = up;
                self.nodes[up].down = down;
                self.sizes[col] -= 1;
                j = self.nodes[j].right;
            }
            i = self.nodes[i].down;
        }
    }

    /// Exact inverse of [`cover`](Self::cover).
    pub fn uncover(&mut self, column: usize) {
        let head = header(column);

        let mut i = self.nodes[head].up;
        while i != head {
            let mut j = self.nodes[i].left;
            while j != i {
                let Node { up, down, column: col, .. } = self.nodes[j];
                self.sizes[col] += 1;
                self.nodes[down].up = j;
                self.nodes[up].down = j;
                j = self.nodes[j].left;
            }
            i = self.nodes[i].up;
        }

        let Node { left, right, .. } = self.nodes[head];
        self.nodes[right].left = head;
        self.nodes[left].right = head;
    }

    /// Finds any node of `row` by scanning the active columns.
    pub(crate) fn find_row_node(&self, row: usize) -> Option<NodeId> {
        let mut head = self.nodes[ROOT].right;
        while head != ROOT {
            let mut id = self.nodes[head].down;
            while id != head {
                if self.nodes[id].row == row {
                    return Some(id);
                }
                id = self.nodes[id].down;
            }
            head = self.nodes[head].right;
        }
        None
    }

    pub(crate) fn header_of(&self, column: usize) -> NodeId {
        header(column)
    }

    pub(crate) fn down(&self, id: NodeId) -> NodeId {
        self.nodes[id].down
    }

    pub(crate) fn row_of(&self, id: NodeId) -> usize {
        self.nodes[id].row
    }

    pub(crate) fn column_of(&self, id: NodeId) -> usize {
        self.nodes[id].column
    }

    /// Covers every other column of the row containing `id`, moving right.
    pub(crate) fn cover_row_siblings(&mut self, id: NodeId) {
        let mut j = self.nodes[id].right;
        while j != id {
            self.cover(self.nodes[j].column);
            j = self.nodes[j].right;
        }
    }

    /// Undoes [`cover_row_siblings`](Self::cover_row_siblings), moving left.
    pub(crate) fn uncover_row_siblings(&mut self, id: NodeId) {
        let mut j = self.nodes[id].left;
        while j != id {
            self.uncover(self.nodes[j].column);
            j = self.nodes[j].left;
        }
    }
}

#[inline(always)]
const fn header(column: usize) -> NodeId {
    column + 1
}
