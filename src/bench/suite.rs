//! Ordered name -> workload mapping for `compare`

use std::hint::black_box;

/// Anything a workload may return.
///
/// Plain values are ignored; an `Err` marks the invocation as failed.
pub trait Outcome {
    fn into_result(self) -> anyhow::Result<()>;
}

impl Outcome for () {
    #[inline]
    fn into_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<T, E> Outcome for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    #[inline]
    fn into_result(self) -> anyhow::Result<()> {
        self.map(drop).map_err(Into::into)
    }
}

/// A boxed workload with its outcome already normalized
pub type Workload<'a> = Box<dyn FnMut() -> anyhow::Result<()> + 'a>;

/// Named workloads, kept in insertion order.
///
/// Execution and report order follow insertion. Adding a name that is
/// already present swaps in the new workload at its existing position.
#[derive(Default)]
pub struct Suite<'a> {
    entries: Vec<(String, Workload<'a>)>,
}

impl<'a> Suite<'a> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builder-style `insert`
    pub fn add<F, R>(mut self, name: impl Into<String>, workload: F) -> Self
    where
        F: FnMut() -> R + 'a,
        R: Outcome,
    {
        self.insert(name, workload);
        self
    }

    pub fn insert<F, R>(&mut self, name: impl Into<String>, mut workload: F)
    where
        F: FnMut() -> R + 'a,
        R: Outcome,
    {
        let name = name.into();
        let boxed: Workload<'a> = Box::new(move || black_box(workload()).into_result());

        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = boxed,
            None => self.entries.push((name, boxed)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Workload<'a>)> {
        self.entries
            .iter_mut()
            .map(|(name, workload)| (name.as_str(), workload))
    }
}

impl std::fmt::Debug for Suite<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
