use slotmap::new_key_type;

// Stable handles into the `Structure` arenas. They are only meaningful for the
// structure that issued them.
new_key_type! {
    pub struct AtomId;
    pub struct ResidueId;
    pub struct ChainId;
}
