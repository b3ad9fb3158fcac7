use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::AuthorSummary;
use crate::error::RepoError;
use crate::ports::UserRepository;

/// A value paired with its resolved author. `None` when the author no longer exists.
#[derive(Debug, Clone)]
pub struct Authored<T> {
    pub item: T,
    pub author: Option<AuthorSummary>,
}

/// Resolve author ids to `{id, username}` with a single batch lookup.
pub(crate) async fn author_directory<I>(
    users: &dyn UserRepository,
    ids: I,
) -> Result<HashMap<Uuid, AuthorSummary>, RepoError>
where
    I: IntoIterator<Item = Uuid>,
{
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let found = users.find_by_ids(&ids).await?;
    Ok(found
        .iter()
        .map(|user| (user.id, AuthorSummary::from(user)))
        .collect())
}

/// Pair every item with its author from `directory`.
pub(crate) fn attach<T, F>(
    items: Vec<T>,
    directory: &HashMap<Uuid, AuthorSummary>,
    author_of: F,
) -> Vec<Authored<T>>
where
    F: Fn(&T) -> Uuid,
{
    items
        .into_iter()
        .map(|item| {
            let author = directory.get(&author_of(&item)).cloned();
            Authored { item, author }
        })
        .collect()
}
