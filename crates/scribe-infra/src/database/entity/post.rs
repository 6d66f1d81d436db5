//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

// Deleting a user leaves their posts in place; the schema has no FK on author_id.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    User,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::reaction::Entity")]
    Reaction,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::reaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for scribe_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            content: model.content,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<scribe_core::domain::Post> for ActiveModel {
    fn from(post: scribe_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title),
            content: Set(post.content),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
