/*!
 * Profile domain operations.
 *
 * Responsibility:
 * - merge: find-or-create resolution and field-level update sets
 * - experience: head-insertion editing of the embedded work history
 *
 * Handlers call these with the authenticated owner id; all persistence goes
 * through the ProfileStore trait.
 */
mod experience;
mod merge;

pub use experience::add_experience;
pub use merge::{
    delete_profile, get_profile, get_profile_by_owner_id, list_profiles, parse_skills,
    upsert_profile,
};
