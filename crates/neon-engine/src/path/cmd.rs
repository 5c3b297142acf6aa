use crate::coords::Vec2;

/// A single path drawing command in content space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathCmd {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
    /// Ends the current subpath. No closing edge is produced.
    Close,
}

/// Ordered list of path commands.
///
/// ```
/// use neon_engine::path::Path;
///
/// let mut path = Path::new();
/// path.move_to(0.0, 0.0).line_to(10.0, 0.0).quad_to(15.0, 5.0, 10.0, 10.0);
/// assert_eq!(path.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    cmds: Vec<PathCmd>,
}

impl Path {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn from_cmds(cmds: Vec<PathCmd>) -> Self {
        Self { cmds }
    }

    #[inline]
    pub fn cmds(&self) -> &[PathCmd] {
        &self.cmds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    #[inline]
    pub fn push(&mut self, cmd: PathCmd) -> &mut Self {
        self.cmds.push(cmd);
        self
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.push(PathCmd::MoveTo(Vec2::new(x, y)))
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.push(PathCmd::LineTo(Vec2::new(x, y)))
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        self.push(PathCmd::QuadTo {
            ctrl: Vec2::new(cx, cy),
            to: Vec2::new(x, y),
        })
    }

    pub fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> &mut Self {
        self.push(PathCmd::CubicTo {
            ctrl1: Vec2::new(c1x, c1y),
            ctrl2: Vec2::new(c2x, c2y),
            to: Vec2::new(x, y),
        })
    }

    pub fn close(&mut self) -> &mut Self {
        self.push(PathCmd::Close)
    }

    /// Splits the command list before every `MoveTo`.
    ///
    /// Leading commands that precede the first `MoveTo` form their own subpath.
    #[inline]
    pub fn subpaths(&self) -> Subpaths<'_> {
        Subpaths { rest: &self.cmds }
    }
}

impl From<Vec<PathCmd>> for Path {
    fn from(cmds: Vec<PathCmd>) -> Self {
        Self::from_cmds(cmds)
    }
}

impl FromIterator<PathCmd> for Path {
    fn from_iter<I: IntoIterator<Item = PathCmd>>(iter: I) -> Self {
        Self::from_cmds(iter.into_iter().collect())
    }
}

/// Iterator over the subpaths of a [`Path`] as command slices.
#[derive(Debug, Clone)]
pub struct Subpaths<'a> {
    rest: &'a [PathCmd],
}

impl<'a> Iterator for Subpaths<'a> {
    type Item = &'a [PathCmd];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        // Skip index 0 so a subpath starting with MoveTo keeps it.
        let end = self.rest[1..]
            .iter()
            .position(|c| matches!(c, PathCmd::MoveTo(_)))
            .map_or(self.rest.len(), |i| i + 1);

        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(head)
    }
}
