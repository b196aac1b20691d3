//! Chain variables
//!
//! A chain variable is the typed binding for "the current unwrapped
//! value" at some point in the pipeline. Identity is the arena index, not
//! the name: two records referring to the same index refer to the same
//! binding no matter how naming turns out, so a late rename can never
//! desynchronize them.

use smallvec::SmallVec;

/// Arena index of a chain variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

impl VarId {
    /// The distinguished stub: "no input yet", start of a chain
    pub const STUB: VarId = VarId(usize::MAX);

    /// Is this the stub variable?
    #[inline]
    pub fn is_stub(self) -> bool {
        self == Self::STUB
    }
}

/// One chain-variable slot
#[derive(Debug, Clone)]
pub struct VarData {
    /// Value type text (host-language type of the unwrapped value)
    pub ty: String,
    /// Ranked name suggestions, best first
    pub candidates: SmallVec<[String; 4]>,
    /// Chosen name, set during registration
    pub name: Option<String>,
    /// Registered exactly once before code generation
    pub registered: bool,
    /// Statically known to hold the absent sentinel (`Empty` source)
    pub known_absent: bool,
    /// Reuses an existing host binding; no declaration is emitted
    pub reuse_existing: bool,
    /// Declaration must be hoisted before the guarded region
    pub hoisted: bool,
}

/// Arena of chain variables for one lowering attempt
#[derive(Debug, Default)]
pub struct VarArena {
    slots: Vec<VarData>,
}

impl VarArena {
    /// Create an empty arena
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh variable of the given value type
    pub fn alloc(&mut self, ty: impl Into<String>) -> VarId {
        let id = VarId(self.slots.len());
        self.slots.push(VarData {
            ty: ty.into(),
            candidates: SmallVec::new(),
            name: None,
            registered: false,
            known_absent: false,
            reuse_existing: false,
            hoisted: false,
        });
        id
    }

    pub fn get(&self, id: VarId) -> &VarData {
        assert!(!id.is_stub(), "stub variable has no data");
        &self.slots[id.0]
    }

    pub fn get_mut(&mut self, id: VarId) -> &mut VarData {
        assert!(!id.is_stub(), "stub variable has no data");
        &mut self.slots[id.0]
    }

    /// Value type of a variable
    pub fn ty(&self, id: VarId) -> &str {
        &self.get(id).ty
    }

    /// Rendered reference to a variable: its registered name, or the
    /// absent sentinel for a variable that is statically absent.
    pub fn display_name(&self, id: VarId) -> &str {
        let data = self.get(id);
        if data.known_absent {
            return "null";
        }
        data.name
            .as_deref()
            .expect("variable referenced before registration")
    }

    /// Append a name candidate (duplicates are kept out)
    pub fn add_candidate(&mut self, id: VarId, candidate: impl Into<String>) {
        let candidate = candidate.into();
        let data = self.get_mut(id);
        if !data.candidates.iter().any(|c| *c == candidate) {
            data.candidates.push(candidate);
        }
    }

    /// Find a registered variable by name
    pub fn find_by_name(&self, name: &str) -> Option<VarId> {
        self.slots
            .iter()
            .position(|slot| slot.registered && slot.name.as_deref() == Some(name))
            .map(VarId)
    }

    /// Number of allocated variables
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
