//! Queries over the `apps` table.
//!
//! Listing is keyset-paginated on `(name, id)`: `id` breaks ties between
//! equal names so every row has exactly one position in the order and a
//! cursor never skips or repeats rows.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::cursor::{CursorPage, NameCursor};
use super::entities::app::{self, AppState};
use super::entities::App;

/// Caller-supplied fields of a new app. Everything else is generated.
#[derive(Clone, Debug)]
pub struct NewApp {
    pub entity_id: Uuid,
    pub chain_id: Option<i32>,
    pub name: String,
    /// Defaults to `Active` when `None`
    pub state: Option<AppState>,
}

/// Apps of one entity in the `Active` state
fn active_apps_for_entity(entity_id: Uuid) -> Select<App> {
    App::find()
        .filter(app::Column::EntityId.eq(entity_id))
        .filter(app::Column::State.eq(AppState::Active))
}

/// Page through an entity's active apps ordered by name, then id.
///
/// Returns at most `limit` rows strictly after `cursor` (or from the start
/// when there is none). `next_cursor` is set only if more rows follow.
pub async fn get_active_apps_for_entity_by_cursor<C: ConnectionTrait>(
    db: &C,
    entity_id: Uuid,
    limit: u64,
    cursor: Option<&NameCursor>,
) -> Result<CursorPage<app::Model>, DbErr> {
    if limit == 0 {
        return Ok(CursorPage::empty());
    }

    let mut query = active_apps_for_entity(entity_id);

    if let Some(cursor) = cursor {
        query = query.filter(
            Condition::any()
                .add(app::Column::Name.gt(cursor.name.as_str()))
                .add(
                    Condition::all()
                        .add(app::Column::Name.eq(cursor.name.as_str()))
                        .add(app::Column::Id.gt(cursor.id)),
                ),
        );
    }

    // One extra row tells us whether another page exists
    let mut records = query
        .order_by_asc(app::Column::Name)
        .order_by_asc(app::Column::Id)
        .limit(limit.saturating_add(1))
        .all(db)
        .await?;

    let has_more = records.len() as u64 > limit;
    if has_more {
        records.truncate(limit as usize);
    }

    let next_cursor = if has_more {
        records
            .last()
            .map(|last| NameCursor::new(last.name.clone(), last.id))
    } else {
        None
    };

    tracing::debug!(
        "Listed {} active apps for entity {} (more: {})",
        records.len(),
        entity_id,
        has_more
    );

    Ok(CursorPage {
        records,
        next_cursor,
    })
}

/// Count an entity's active apps. No result row counts as zero.
pub async fn get_active_apps_count<C: ConnectionTrait>(
    db: &C,
    entity_id: Uuid,
) -> Result<u64, DbErr> {
    let count: Option<i64> = active_apps_for_entity(entity_id)
        .select_only()
        .column_as(Expr::col(app::Column::Id).count(), "count")
        .into_tuple()
        .one(db)
        .await?;

    Ok(count.map(|c| c.max(0) as u64).unwrap_or(0))
}

/// Persist a new app and return the stored row, generated fields included
pub async fn insert_app<C: ConnectionTrait>(db: &C, new_app: NewApp) -> Result<app::Model, DbErr> {
    let mut model = app::ActiveModel::new();
    model.entity_id = Set(new_app.entity_id);
    model.chain_id = Set(new_app.chain_id);
    model.name = Set(new_app.name);
    if let Some(state) = new_app.state {
        model.state = Set(state);
    }

    model.insert(db).await
}
