use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireClassAccess};
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::attendance::requests::CreateSessionRequest;
use crate::models::classes::requests::{
    ClassListParams, CreateClassRequest, EnrollStudentsRequest, UpdateClassRequest,
};
use crate::models::topics::requests::{
    CreateMaterialRequest, CreateTopicRequest, UpdateTopicRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, AttendanceService, ClassService, TopicService};
use crate::utils::{SafeClassIdI64, SafeMaterialIdI64, SafeStudentIdI64, SafeTopicIdI64};

// 懒加载的全局服务实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);
static TOPIC_SERVICE: Lazy<TopicService> = Lazy::new(TopicService::new_lazy);
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

// 班级
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassListParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(query.into_inner(), &req).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(class_data.into_inner(), &req)
        .await
}

pub async fn get_class(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req).await
}

pub async fn update_class(
    req: HttpRequest,
    update_data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(update_data.into_inner(), &req)
        .await
}

pub async fn delete_class(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(class_id.0, &req).await
}

// 成员
pub async fn list_members(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_members(&req).await
}

pub async fn enroll_students(
    req: HttpRequest,
    data: web::Json<EnrollStudentsRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.enroll_students(data.into_inner(), &req).await
}

pub async fn enroll_homeroom(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.enroll_homeroom(&req).await
}

pub async fn remove_member(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.remove_member(student_id.0, &req).await
}

// 主题
pub async fn list_topics(req: HttpRequest) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.list_topics(&req).await
}

pub async fn create_topic(
    req: HttpRequest,
    data: web::Json<CreateTopicRequest>,
) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.create_topic(data.into_inner(), &req).await
}

pub async fn get_topic(req: HttpRequest, topic_id: SafeTopicIdI64) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.get_topic_detail(topic_id.0, &req).await
}

pub async fn update_topic(
    req: HttpRequest,
    topic_id: SafeTopicIdI64,
    data: web::Json<UpdateTopicRequest>,
) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE
        .update_topic(topic_id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_topic(req: HttpRequest, topic_id: SafeTopicIdI64) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.delete_topic(topic_id.0, &req).await
}

pub async fn list_materials(
    req: HttpRequest,
    topic_id: SafeTopicIdI64,
) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE.list_materials(topic_id.0, &req).await
}

pub async fn create_material(
    req: HttpRequest,
    topic_id: SafeTopicIdI64,
    data: web::Json<CreateMaterialRequest>,
) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE
        .create_material(topic_id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_material(
    req: HttpRequest,
    topic_id: SafeTopicIdI64,
    material_id: SafeMaterialIdI64,
) -> ActixResult<HttpResponse> {
    TOPIC_SERVICE
        .delete_material(topic_id.0, material_id.0, &req)
        .await
}

// 主题下的作业与考勤场次
pub async fn list_assignments(
    req: HttpRequest,
    topic_id: SafeTopicIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_assignments(topic_id.0, &req).await
}

pub async fn create_assignment(
    req: HttpRequest,
    topic_id: SafeTopicIdI64,
    data: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(topic_id.0, data.into_inner(), &req)
        .await
}

pub async fn list_sessions(
    req: HttpRequest,
    topic_id: SafeTopicIdI64,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.list_sessions(topic_id.0, &req).await
}

pub async fn create_session(
    req: HttpRequest,
    topic_id: SafeTopicIdI64,
    data: web::Json<CreateSessionRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .create_session(topic_id.0, data.into_inner(), &req)
        .await
}

// 配置路由
//
// `/{class_id}` 下的路由由 RequireClassAccess 解析班级并校验访问级别：
// members() 允许已选课学生读取，managers() 仅限任课教师和管理员。
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_classes))
            .route(
                "",
                web::post()
                    .to(create_class)
                    // 教师为自己创建班级，管理员可以指定教师
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .route(
                "/{class_id}",
                web::get().to(get_class).wrap(RequireClassAccess::members()),
            )
            .route(
                "/{class_id}",
                web::put().to(update_class).wrap(RequireClassAccess::managers()),
            )
            .route(
                "/{class_id}",
                web::delete()
                    .to(delete_class)
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .route(
                "/{class_id}/members",
                web::get().to(list_members).wrap(RequireClassAccess::managers()),
            )
            .route(
                "/{class_id}/members",
                web::post()
                    .to(enroll_students)
                    .wrap(RequireClassAccess::managers()),
            )
            // 必须在 /members/{student_id} 之前注册
            .route(
                "/{class_id}/members/homeroom",
                web::post()
                    .to(enroll_homeroom)
                    .wrap(RequireClassAccess::managers()),
            )
            .route(
                "/{class_id}/members/{student_id}",
                web::delete()
                    .to(remove_member)
                    .wrap(RequireClassAccess::managers()),
            )
            .route(
                "/{class_id}/topics",
                web::get().to(list_topics).wrap(RequireClassAccess::members()),
            )
            .route(
                "/{class_id}/topics",
                web::post().to(create_topic).wrap(RequireClassAccess::managers()),
            )
            .route(
                "/{class_id}/topics/{topic_id}",
                web::get().to(get_topic).wrap(RequireClassAccess::members()),
            )
            .route(
                "/{class_id}/topics/{topic_id}",
                web::put().to(update_topic).wrap(RequireClassAccess::managers()),
            )
            .route(
                "/{class_id}/topics/{topic_id}",
                web::delete()
                    .to(delete_topic)
                    .wrap(RequireClassAccess::managers()),
            )
            .route(
                "/{class_id}/topics/{topic_id}/materials",
                web::get()
                    .to(list_materials)
                    .wrap(RequireClassAccess::members()),
            )
            .route(
                "/{class_id}/topics/{topic_id}/materials",
                web::post()
                    .to(create_material)
                    .wrap(RequireClassAccess::managers()),
            )
            .route(
                "/{class_id}/topics/{topic_id}/materials/{material_id}",
                web::delete()
                    .to(delete_material)
                    .wrap(RequireClassAccess::managers()),
            )
            .route(
                "/{class_id}/topics/{topic_id}/assignments",
                web::get()
                    .to(list_assignments)
                    .wrap(RequireClassAccess::members()),
            )
            .route(
                "/{class_id}/topics/{topic_id}/assignments",
                web::post()
                    .to(create_assignment)
                    .wrap(RequireClassAccess::managers()),
            )
            .route(
                "/{class_id}/topics/{topic_id}/attendance",
                web::get()
                    .to(list_sessions)
                    .wrap(RequireClassAccess::members()),
            )
            .route(
                "/{class_id}/topics/{topic_id}/attendance",
                web::post()
                    .to(create_session)
                    .wrap(RequireClassAccess::managers()),
            ),
    );
}
