use crate::library::Library;
use crate::reader::Reader;
use anyhow::Result;
use manga_den_storage::Store;
use tokio::net::TcpListener;

pub async fn serve(port: u16, store: Store, admin_token: Option<String>) -> Result<()> {
    let library = Library::new(store.clone());
    let reader = Reader::new(store);
    let app = super::routes::create_router(library, reader, admin_token);
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
