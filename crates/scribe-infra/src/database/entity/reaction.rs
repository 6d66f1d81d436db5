//! Reaction entity for SeaORM. `(post_id, user_id)` carries a unique index.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use scribe_core::domain::ReactionKind;

/// Stored form of [`ReactionKind`]; any other string fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Kind {
    #[sea_orm(string_value = "upvote")]
    Upvote,
    #[sea_orm(string_value = "downvote")]
    Downvote,
}

impl From<ReactionKind> for Kind {
    fn from(kind: ReactionKind) -> Self {
        match kind {
            ReactionKind::Upvote => Kind::Upvote,
            ReactionKind::Downvote => Kind::Downvote,
        }
    }
}

impl From<Kind> for ReactionKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Upvote => ReactionKind::Upvote,
            Kind::Downvote => ReactionKind::Downvote,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub kind: Kind,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for scribe_core::domain::Reaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            user_id: model.user_id,
            kind: model.kind.into(),
            created_at: model.created_at.into(),
        }
    }
}

impl From<scribe_core::domain::Reaction> for ActiveModel {
    fn from(reaction: scribe_core::domain::Reaction) -> Self {
        Self {
            id: Set(reaction.id),
            post_id: Set(reaction.post_id),
            user_id: Set(reaction.user_id),
            kind: Set(reaction.kind.into()),
            created_at: Set(reaction.created_at.into()),
        }
    }
}
