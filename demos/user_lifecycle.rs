use petstore_verify::{petstore, ApiConfig, FakeFixtures, PetStoreApi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let api = PetStoreApi::new(ApiConfig::default());
    let user = petstore::new_user(&mut FakeFixtures::new());

    let created = api.create_user(&user).await?;
    println!("created user {} (id {})", user.username, created.message);

    let login = api.login(&user.username, &user.password).await?;
    println!("{}", login.message);

    api.logout().await?;
    let deleted = api.delete_user(&user.username).await?;
    println!("deleted user {}", deleted.message);

    Ok(())
}
