/*!
# Vertex Colors

Per-vertex visitation state of a traversal:

| Color   | Meaning                                                        |
|---------|----------------------------------------------------------------|
| `None`  | never touched (the value of every absent entry)                |
| `White` | explicitly reset to undiscovered                                |
| `Gray`  | discovered and open: on the DFS stack or in the BFS queue      |
| `Black` | finished: every out-edge examined (DFS: whole subtree explored) |

A [`ColorMap`] is owned by exactly one traversal for its whole duration. Dense graphs use a
`Vec<Color>` (ideally rented from a [`Pool`](super::pool::Pool)), opaque vertices a hash map.
*/

use std::{
    collections::HashMap,
    hash::{BuildHasher, Hash},
};

use crate::node::Node;

/// Visitation state of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Color {
    #[default]
    None,
    White,
    Gray,
    Black,
}

impl Color {
    /// Returns `true` for `None` and `White`
    #[inline]
    pub fn is_undiscovered(self) -> bool {
        matches!(self, Color::None | Color::White)
    }
}

/// Mutable map from vertex to [`Color`].
pub trait ColorMap<V> {
    /// Returns the color of `v`; vertices never set are [`Color::None`]
    fn color_of(&self, v: V) -> Color;

    /// Sets the color of `v`
    fn set_color(&mut self, v: V, color: Color);
}

/// Dense color map; reads past the end are `None` and writes past the end grow the vector.
impl ColorMap<Node> for Vec<Color> {
    #[inline]
    fn color_of(&self, v: Node) -> Color {
        self.get(v as usize).copied().unwrap_or_default()
    }

    #[inline]
    fn set_color(&mut self, v: Node, color: Color) {
        let v = v as usize;
        if v >= self.len() {
            self.resize(v + 1, Color::None);
        }
        self[v] = color;
    }
}

impl<V, S> ColorMap<V> for HashMap<V, Color, S>
where
    V: Eq + Hash,
    S: BuildHasher,
{
    #[inline]
    fn color_of(&self, v: V) -> Color {
        self.get(&v).copied().unwrap_or_default()
    }

    #[inline]
    fn set_color(&mut self, v: V, color: Color) {
        self.insert(v, color);
    }
}

impl<V, C> ColorMap<V> for &mut C
where
    C: ColorMap<V> + ?Sized,
{
    #[inline]
    fn color_of(&self, v: V) -> Color {
        (**self).color_of(v)
    }

    #[inline]
    fn set_color(&mut self, v: V, color: Color) {
        (**self).set_color(v, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashMap;

    #[test]
    fn undiscovered_colors() {
        assert!(Color::None.is_undiscovered());
        assert!(Color::White.is_undiscovered());
        assert!(!Color::Gray.is_undiscovered());
        assert!(!Color::Black.is_undiscovered());
        assert_eq!(Color::default(), Color::None);
    }

    #[test]
    fn dense_color_map_grows() {
        let mut colors: Vec<Color> = Vec::new();
        assert_eq!(colors.color_of(7), Color::None);
        colors.set_color(3, Color::Gray);
        assert_eq!(colors.len(), 4);
        assert_eq!(colors.color_of(3), Color::Gray);
        assert_eq!(colors.color_of(2), Color::None);
        assert_eq!(colors.color_of(1000), Color::None);
    }

    #[test]
    fn sparse_color_map() {
        let mut colors: FxHashMap<&str, Color> = FxHashMap::default();
        assert_eq!(colors.color_of("a"), Color::None);
        colors.set_color("a", Color::Black);
        assert_eq!(colors.color_of("a"), Color::Black);

        let mut by_ref = &mut colors;
        by_ref.set_color("b", Color::White);
        assert_eq!(colors.color_of("b"), Color::White);
    }
}
