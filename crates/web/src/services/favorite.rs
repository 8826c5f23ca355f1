use crate::proto::favorite_service_server::FavoriteService;
use crate::proto::{
    CreateFavoriteRequest, DeleteAllFavoritesOfFileRequest, DeleteAllFavoritesOfFileResponse,
    DeleteFavoriteRequest, FavoriteObject, GetAllFavoritesByUserIdRequest,
    GetAllFavoritesByUserIdResponse, IsFavoriteRequest, IsFavoriteResponse,
};
use favorites::{Controller, Error, FavoriteRecord, MongoStore, Store};
use tonic::{Request, Response, Status};


/// Request handlers for the favorite service. Each handler validates the
/// required fields, delegates to the controller and marshals the domain
/// result onto the wire schema. No handler touches the store directly.
pub struct FavoriteServiceImpl<S = MongoStore> {
    controller: Controller<S>,
}

impl<S> FavoriteServiceImpl<S> {
    pub fn new(controller: Controller<S>) -> Self {
        Self { controller }
    }
}

// Empty identifiers are rejected before any store interaction.
fn required(field: &str, value: &str) -> Result<(), Status> {
    if value.is_empty() {
        return Err(Status::invalid_argument(format!("{field} is required")));
    }
    Ok(())
}

fn marshal(record: FavoriteRecord) -> FavoriteObject {
    FavoriteObject {
        file_id: record.file_id,
        user_id: record.user_id,
    }
}

fn to_status(err: Error) -> Status {
    match err {
        Error::NotFound => Status::not_found("favorite not found"),
        Error::AlreadyExists => Status::already_exists("favorite already exists"),
        Error::Storage(e) => Status::internal(format!("storage failure: {e}")),
    }
}

#[tonic::async_trait]
impl<S: Store + 'static> FavoriteService for FavoriteServiceImpl<S> {
    async fn create_favorite(
        &self,
        request: Request<CreateFavoriteRequest>,
    ) -> Result<Response<FavoriteObject>, Status> {
        let req = request.get_ref();
        required("userID", &req.user_id)?;
        required("fileID", &req.file_id)?;

        let favorite = self
            .controller
            .create_favorite(&req.file_id, &req.user_id)
            .await
            .map_err(to_status)?;

        Ok(Response::new(marshal(favorite)))
    }

    async fn delete_favorite(
        &self,
        request: Request<DeleteFavoriteRequest>,
    ) -> Result<Response<FavoriteObject>, Status> {
        let req = request.get_ref();
        required("userID", &req.user_id)?;
        required("fileID", &req.file_id)?;

        let favorite = self
            .controller
            .delete_favorite(&req.file_id, &req.user_id)
            .await
            .map_err(to_status)?;

        Ok(Response::new(marshal(favorite)))
    }

    async fn get_all_favorites_by_user_id(
        &self,
        request: Request<GetAllFavoritesByUserIdRequest>,
    ) -> Result<Response<GetAllFavoritesByUserIdResponse>, Status> {
        let req = request.get_ref();
        required("userID", &req.user_id)?;

        let fav_file_id_list = self
            .controller
            .get_all_favorites_by_user_id(&req.user_id)
            .await
            .map_err(to_status)?;

        Ok(Response::new(GetAllFavoritesByUserIdResponse {
            fav_file_id_list,
        }))
    }

    async fn is_favorite(
        &self,
        request: Request<IsFavoriteRequest>,
    ) -> Result<Response<IsFavoriteResponse>, Status> {
        let req = request.get_ref();
        required("userID", &req.user_id)?;
        required("fileID", &req.file_id)?;

        // Absence is a false answer here, never a caller-visible fault.
        match self
            .controller
            .get_by_file_and_user(&req.file_id, &req.user_id)
            .await
        {
            Ok(_) => Ok(Response::new(IsFavoriteResponse { is_favorite: true })),
            Err(Error::NotFound) => Ok(Response::new(IsFavoriteResponse { is_favorite: false })),
            Err(err) => Err(to_status(err)),
        }
    }

    async fn delete_all_favorites_of_file(
        &self,
        request: Request<DeleteAllFavoritesOfFileRequest>,
    ) -> Result<Response<DeleteAllFavoritesOfFileResponse>, Status> {
        let req = request.get_ref();
        required("fileID", &req.file_id)?;

        let outcome = self
            .controller
            .delete_all_by_file(&req.file_id)
            .await
            .map_err(to_status)?;

        Ok(Response::new(DeleteAllFavoritesOfFileResponse {
            acknowledged: outcome.acknowledged,
            deleted_count: outcome.deleted_count,
        }))
    }
}
