/// "Now featured" pointer over the loaded catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeroRotator {
    #[default]
    Idle,
    Cycling {
        index: usize,
        len: usize,
    },
}

impl HeroRotator {
    /// Restart over a catalog of `len` items.  Returns whether a timer is
    /// needed, i.e. whether the rotator is now cycling.
    pub fn reset(&mut self, len: usize) -> bool {
        *self = if len == 0 {
            Self::Idle
        } else {
            Self::Cycling { index: 0, len }
        };
        self.is_cycling()
    }

    pub fn tick(&mut self) {
        if let Self::Cycling { index, len } = self {
            *index = (*index + 1) % *len;
        }
    }

    pub fn current(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Cycling { index, .. } => Some(*index),
        }
    }

    pub fn is_cycling(&self) -> bool {
        matches!(self, Self::Cycling { .. })
    }
}
