use std::sync::Arc;

use domain::{
    parse_birth_date, NewPost, NewUser, PersonName, PostContent, UserAlias, UserEmail,
};

use crate::{
    clock::Clock,
    error::ApplicationError,
    password::PasswordHasher,
    repository::{PostRepository, UserRepository},
};

pub const DEMO_PASSWORD: &str = "123456";

struct DemoUser {
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    alias: &'static str,
    birth_date: &'static str,
    post: &'static str,
}

const DEMO_USERS: [DemoUser; 5] = [
    DemoUser {
        email: "juan.perez@example.com",
        first_name: "Juan",
        last_name: "Pérez",
        alias: "juanp",
        birth_date: "1990-05-15",
        post: "¡Hola a todos! Este es mi primer post en PeriConecta. Espero conocer gente nueva y compartir experiencias interesantes.",
    },
    DemoUser {
        email: "maria.garcia@example.com",
        first_name: "María",
        last_name: "García",
        alias: "mariag",
        birth_date: "1988-08-22",
        post: "Hermoso día para salir a caminar por el parque. La naturaleza siempre me inspira y me da energía positiva. 🌳☀️",
    },
    DemoUser {
        email: "carlos.rodriguez@example.com",
        first_name: "Carlos",
        last_name: "Rodríguez",
        alias: "carlosr",
        birth_date: "1992-12-03",
        post: "Acabo de terminar de leer un libro increíble sobre desarrollo personal. Las pequeñas acciones diarias realmente marcan la diferencia.",
    },
    DemoUser {
        email: "ana.martinez@example.com",
        first_name: "Ana",
        last_name: "Martínez",
        alias: "anam",
        birth_date: "1995-03-18",
        post: "Cocinando mi receta favorita de pasta. No hay nada como una buena comida casera para alegrar el día. ¿Cuál es su plato favorito?",
    },
    DemoUser {
        email: "luis.lopez@example.com",
        first_name: "Luis",
        last_name: "López",
        alias: "luisl",
        birth_date: "1987-11-07",
        post: "Reflexionando sobre los objetivos del año. Es importante pausar de vez en cuando y evaluar nuestro progreso. ¡Sigamos adelante!",
    },
];

/// What a seeding run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already had users; nothing was written.
    Skipped,
    Seeded { users: usize, posts: usize },
}

pub struct DemoSeederDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub post_repository: Arc<dyn PostRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

/// Fills an empty store with five demo users and one post each.
pub struct DemoSeeder {
    deps: DemoSeederDependencies,
}

impl DemoSeeder {
    pub fn new(deps: DemoSeederDependencies) -> Self {
        Self { deps }
    }

    pub async fn seed(&self) -> Result<SeedOutcome, ApplicationError> {
        let existing = self.deps.user_repository.count().await?;
        if existing > 0 {
            tracing::info!(existing, "store already has users, skipping demo seed");
            return Ok(SeedOutcome::Skipped);
        }

        tracing::info!("seeding demo data");
        let password = self.deps.password_hasher.hash(DEMO_PASSWORD).await?;

        let mut users = Vec::with_capacity(DEMO_USERS.len());
        for demo in &DEMO_USERS {
            let user = NewUser {
                email: UserEmail::parse(demo.email)?,
                password: password.clone(),
                first_name: PersonName::parse("firstName", demo.first_name)?,
                last_name: PersonName::parse("lastName", demo.last_name)?,
                alias: UserAlias::parse(demo.alias)?,
                birth_date: parse_birth_date(demo.birth_date)?,
                created_at: self.deps.clock.now(),
            };
            let stored = self.deps.user_repository.create(user).await?;
            tracing::info!(user_id = %stored.id, alias = %stored.alias, "demo user created");
            users.push((stored.id, demo.post));
        }

        let mut posts = 0;
        for (user_id, body) in &users {
            let post = NewPost::new(PostContent::new(*body)?, *user_id, self.deps.clock.now());
            let stored = self.deps.post_repository.create(post).await?;
            tracing::debug!(post_id = %stored.id, user_id = %user_id, "demo post created");
            posts += 1;
        }

        tracing::info!(
            users = users.len(),
            posts,
            password = DEMO_PASSWORD,
            "demo seed complete"
        );
        Ok(SeedOutcome::Seeded {
            users: users.len(),
            posts,
        })
    }
}
