//! Agent kinds and their closed state sets.
//!
//! `StateId` is the union of every state any kind can be in.  Each kind
//! declares the subset it may use, in priority-table order; that order is
//! also the tie-break order between equal priorities.

/// Colonist or enemy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentKind {
    Colonist,
    Enemy,
}

impl AgentKind {
    pub fn name(self) -> &'static str {
        match self {
            AgentKind::Colonist => "colonist",
            AgentKind::Enemy    => "enemy",
        }
    }

    /// Declared states in declaration order.
    pub fn declared_states(self) -> &'static [StateId] {
        match self {
            AgentKind::Colonist => &COLONIST_STATES,
            AgentKind::Enemy    => &ENEMY_STATES,
        }
    }

    #[inline]
    pub fn declares(self, state: StateId) -> bool {
        self.declared_states().contains(&state)
    }

    /// Position of `state` in the declaration order.
    #[inline]
    pub fn declaration_index(self, state: StateId) -> Option<usize> {
        self.declared_states().iter().position(|s| *s == state)
    }

    /// State a freshly spawned agent starts in.
    pub fn initial_state(self) -> StateId {
        match self {
            AgentKind::Colonist => StateId::SeekTask,
            AgentKind::Enemy    => StateId::Wander,
        }
    }

    /// The safest fallback after a failed tick.
    pub fn fallback_state(self) -> StateId {
        match self {
            AgentKind::Colonist => StateId::SeekTask,
            AgentKind::Enemy    => StateId::Idle,
        }
    }
}

/// Every FSM state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateId {
    Dead,
    Flee,
    Drafted,
    Combat,
    Eat,
    Sleep,
    Equipment,
    Build,
    Mine,
    Chop,
    Move,
    Socialize,
    SeekTask,
    Idle,
    Attack,
    Hunt,
    Wander,
}

const COLONIST_STATES: [StateId; 14] = [
    StateId::Dead,
    StateId::Flee,
    StateId::Drafted,
    StateId::Combat,
    StateId::Eat,
    StateId::Sleep,
    StateId::Equipment,
    StateId::Build,
    StateId::Mine,
    StateId::Chop,
    StateId::Move,
    StateId::Socialize,
    StateId::SeekTask,
    StateId::Idle,
];

const ENEMY_STATES: [StateId; 6] = [
    StateId::Dead,
    StateId::Flee,
    StateId::Attack,
    StateId::Hunt,
    StateId::Wander,
    StateId::Idle,
];

impl StateId {
    pub fn name(self) -> &'static str {
        match self {
            StateId::Dead      => "dead",
            StateId::Flee      => "flee",
            StateId::Drafted   => "drafted",
            StateId::Combat    => "combat",
            StateId::Eat       => "eat",
            StateId::Sleep     => "sleep",
            StateId::Equipment => "equipment",
            StateId::Build     => "build",
            StateId::Mine      => "mine",
            StateId::Chop      => "chop",
            StateId::Move      => "move",
            StateId::Socialize => "socialize",
            StateId::SeekTask  => "seek_task",
            StateId::Idle      => "idle",
            StateId::Attack    => "attack",
            StateId::Hunt      => "hunt",
            StateId::Wander    => "wander",
        }
    }

    pub fn parse(s: &str) -> Option<StateId> {
        let s = s.trim().to_ascii_lowercase();
        ALL_STATES.iter().copied().find(|st| st.name() == s || (s == "seektask" && *st == StateId::SeekTask))
    }
}

const ALL_STATES: [StateId; 17] = [
    StateId::Dead,
    StateId::Flee,
    StateId::Drafted,
    StateId::Combat,
    StateId::Eat,
    StateId::Sleep,
    StateId::Equipment,
    StateId::Build,
    StateId::Mine,
    StateId::Chop,
    StateId::Move,
    StateId::Socialize,
    StateId::SeekTask,
    StateId::Idle,
    StateId::Attack,
    StateId::Hunt,
    StateId::Wander,
];

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
