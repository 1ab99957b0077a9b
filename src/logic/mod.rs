//! Tournament business logic: side mapping, result reconciliation, rankings.

mod mapping;
mod ranking;
mod reconcile;

pub use mapping::{infer_side_mapping, MappingAmbiguity, SideMapping};
pub use ranking::{cleanup_orphaned_match_results, recalculate_all_rankings};
pub use reconcile::{
    create_or_update_match_result, delete_match_result, delete_result_for_map,
    override_team_mapping,
};
